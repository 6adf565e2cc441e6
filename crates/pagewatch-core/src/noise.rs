//! Noise learning.
//!
//! Two samples of a page fetched seconds apart differ only where the page
//! renders clocks, counters, nonces and the like. For every differing hunk the
//! stable text leading up to the volatile number (e.g. `"Views: "`) is kept as
//! a noise pattern; later comparisons ignore lines that contain one.

use tracing::debug;

use crate::diff::{diff, ReplacementRecord};

/// Returns the common leading run of `old_block` and `new_block`, stopping at
/// the first differing character, the end of either block, or a digit.
///
/// ```
/// use pagewatch_core::extract_noise;
///
/// assert_eq!(extract_noise("Views: 184", "Views: 290"), "Views: ");
/// assert_eq!(extract_noise("5abc", "5xyz"), "");
/// ```
pub fn extract_noise(old_block: &str, new_block: &str) -> String {
    old_block
        .chars()
        .zip(new_block.chars())
        .take_while(|(a, b)| a == b && !a.is_numeric())
        .map(|(a, _)| a)
        .collect()
}

/// Tuning for the learning phase.
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Patterns shorter than this many characters are dropped.
    pub min_pattern_len: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { min_pattern_len: 1 }
    }
}

impl LearningConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum pattern length.
    pub fn with_min_pattern_len(mut self, len: usize) -> Self {
        self.min_pattern_len = len.max(1);
        self
    }
}

/// Ordered noise patterns learned for one page.
///
/// Never contains an empty pattern: an empty substring matches every line and
/// would suppress all detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoiseProfile {
    patterns: Vec<String>,
}

impl NoiseProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns a profile from two samples taken a short interval apart.
    pub fn learn(old_text: &str, new_text: &str) -> Self {
        Self::learn_with(old_text, new_text, &LearningConfig::default())
    }

    /// Learns a profile with explicit tuning.
    pub fn learn_with(old_text: &str, new_text: &str, config: &LearningConfig) -> Self {
        let records = diff(old_text, new_text).records();
        let mut profile = Self::new();

        for record in &records {
            if let Some(pattern) = pattern_from_record(record, config) {
                profile.patterns.push(pattern);
            }
        }

        debug!(
            hunks = records.len(),
            patterns = profile.patterns.len(),
            "learned noise profile"
        );
        profile
    }

    /// Adds a pattern, refusing empty or whitespace-only strings.
    ///
    /// Returns whether the pattern was added.
    pub fn push(&mut self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    /// Returns the patterns in learning order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if `line` contains one of the patterns.
    pub fn matches_line(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| line.contains(p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FromIterator<String> for NoiseProfile {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut profile = Self::new();
        for pattern in iter {
            profile.push(pattern);
        }
        profile
    }
}

/// Derives a usable pattern from one replacement record.
fn pattern_from_record(record: &ReplacementRecord, config: &LearningConfig) -> Option<String> {
    let raw = extract_noise(record.old_block.trim(), record.new_block.trim());
    // Filtering is per line, so only the first line of a pattern can ever match.
    let pattern = raw.split('\n').next().unwrap_or_default();

    if pattern.trim().is_empty() || pattern.chars().count() < config.min_pattern_len {
        return None;
    }
    Some(pattern.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_noise_stops_at_digits() {
        assert_eq!(extract_noise("Views: 184", "Views: 290"), "Views: ");
    }

    #[test]
    fn test_extract_noise_identical_blocks() {
        assert_eq!(extract_noise("abc", "abc"), "abc");
    }

    #[test]
    fn test_extract_noise_leading_digit() {
        assert_eq!(extract_noise("5abc", "5xyz"), "");
    }

    #[test]
    fn test_extract_noise_stops_at_difference() {
        assert_eq!(extract_noise("token=abc", "token=xyz"), "token=");
        assert_eq!(extract_noise("short", "shorter"), "short");
        assert_eq!(extract_noise("", "anything"), "");
    }

    #[test]
    fn test_extract_noise_is_deterministic() {
        let first = extract_noise("<span>Updated 12:01</span>", "<span>Updated 12:03</span>");
        let second = extract_noise("<span>Updated 12:01</span>", "<span>Updated 12:03</span>");
        assert_eq!(first, second);
        assert_eq!(first, "<span>Updated ");
    }

    #[test]
    fn test_learn_identical_samples_is_empty() {
        let page = "<p>Views: 10</p>\n<p>Static</p>";
        assert!(NoiseProfile::learn(page, page).is_empty());
    }

    #[test]
    fn test_learn_collects_patterns_in_order() {
        let old = "<p>Views: 10</p>\nstatic\n<p>Time 11:02</p>";
        let new = "<p>Views: 12</p>\nstatic\n<p>Time 11:07</p>";
        let profile = NoiseProfile::learn(old, new);
        assert_eq!(profile.patterns(), &["<p>Views: ", "<p>Time "]);
    }

    #[test]
    fn test_learn_drops_patterns_without_stable_prefix() {
        // Pure digits and insertions have nothing to learn from
        let profile = NoiseProfile::learn("123\nfoo", "456\nfoo\nbar");
        assert!(profile.is_empty());
    }

    #[test]
    fn test_learn_drops_whitespace_only_prefix() {
        let profile = NoiseProfile::learn("a\n  1", "a\n  2");
        assert!(profile.is_empty());
    }

    #[test]
    fn test_learn_keeps_first_line_of_multiline_pattern() {
        let old = "head\nsame line\nTotal: 5\ntail";
        let new = "head\nsame line extra\nTotal: 7\ntail";
        let profile = NoiseProfile::learn(old, new);
        assert_eq!(profile.patterns(), &["same line"]);
    }

    #[test]
    fn test_learn_respects_min_pattern_len() {
        let config = LearningConfig::new().with_min_pattern_len(4);
        let profile = NoiseProfile::learn_with("<b>1", "<b>2", &config);
        assert!(profile.is_empty());

        let profile = NoiseProfile::learn_with("Hits: 1", "Hits: 2", &config);
        assert_eq!(profile.patterns(), &["Hits: "]);
    }

    #[test]
    fn test_push_rejects_empty() {
        let mut profile = NoiseProfile::new();
        assert!(!profile.push(""));
        assert!(!profile.push("   "));
        assert!(profile.push("Hits: "));
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn test_matches_line() {
        let profile: NoiseProfile = vec!["Hits: ".to_string()].into_iter().collect();
        assert!(profile.matches_line("<td>Hits: 42</td>"));
        assert!(!profile.matches_line("Welcome"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let profile = NoiseProfile::learn("Hits: 1\nx\nHits: 3", "Hits: 2\nx\nHits: 4");
        assert_eq!(profile.patterns(), &["Hits: ", "Hits: "]);
    }
}
