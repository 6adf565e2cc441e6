//! In-process line diff.
//!
//! Computes the hunks that turn the lines of an old text into the lines of a
//! new text with Myers' algorithm in linear space. Matching runs are kept,
//! differing runs become [`Hunk`]s, and the result renders in the classic
//! "normal" diff format (`3c3`, `< old`, `---`, `> new`).
//!
//! An ignore set suppresses hunks in which every line contains one of the
//! ignore substrings, mirroring `diff -I`.

use std::fmt::Write;
use std::ops::{Index, IndexMut, Range};

/// A pair of text spans that replace each other at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRecord {
    /// Lines removed from the old text, joined with `\n`.
    pub old_block: String,
    /// Lines inserted in the new text, joined with `\n`.
    pub new_block: String,
}

/// A contiguous run of differing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Zero-based index of the first old line in the hunk.
    pub old_start: usize,
    /// Old lines replaced by this hunk (empty for a pure insertion).
    pub old_lines: Vec<String>,
    /// Zero-based index of the first new line in the hunk.
    pub new_start: usize,
    /// New lines introduced by this hunk (empty for a pure deletion).
    pub new_lines: Vec<String>,
}

impl Hunk {
    /// Returns the replacement record for this hunk.
    pub fn record(&self) -> ReplacementRecord {
        ReplacementRecord {
            old_block: self.old_lines.join("\n"),
            new_block: self.new_lines.join("\n"),
        }
    }

    /// Returns true if every line of the hunk contains one of `patterns`.
    ///
    /// An empty pattern list never suppresses a hunk.
    pub fn is_ignorable(&self, patterns: &[&str]) -> bool {
        if patterns.is_empty() {
            return false;
        }
        self.old_lines
            .iter()
            .chain(self.new_lines.iter())
            .all(|line| patterns.iter().any(|p| line.contains(p)))
    }

    /// Renders the hunk in normal diff format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let old_len = self.old_lines.len();
        let new_len = self.new_lines.len();

        let header = match (old_len, new_len) {
            (0, _) => format!("{}a{}", self.old_start, range(self.new_start, new_len)),
            (_, 0) => format!("{}d{}", range(self.old_start, old_len), self.new_start),
            _ => format!(
                "{}c{}",
                range(self.old_start, old_len),
                range(self.new_start, new_len)
            ),
        };
        out.push_str(&header);
        out.push('\n');

        for line in &self.old_lines {
            let _ = writeln!(out, "< {}", line);
        }
        if old_len > 0 && new_len > 0 {
            out.push_str("---\n");
        }
        for line in &self.new_lines {
            let _ = writeln!(out, "> {}", line);
        }
        out
    }
}

/// One-based line range as printed in diff headers.
fn range(start: usize, len: usize) -> String {
    if len == 1 {
        format!("{}", start + 1)
    } else {
        format!("{},{}", start + 1, start + len)
    }
}

/// Result of diffing two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDiff {
    hunks: Vec<Hunk>,
}

impl LineDiff {
    /// Returns true if at least one hunk survived filtering.
    pub fn changed(&self) -> bool {
        !self.hunks.is_empty()
    }

    /// Returns the surviving hunks in order of appearance.
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Returns one replacement record per surviving hunk.
    pub fn records(&self) -> Vec<ReplacementRecord> {
        self.hunks.iter().map(Hunk::record).collect()
    }

    /// Renders all surviving hunks; empty when nothing changed.
    pub fn render(&self) -> String {
        self.hunks.iter().map(Hunk::render).collect()
    }
}

/// Diffs two texts line by line with nothing ignored.
pub fn diff(old_text: &str, new_text: &str) -> LineDiff {
    diff_ignoring::<&str>(old_text, new_text, &[])
}

/// Diffs two texts, dropping hunks made up entirely of lines that contain one
/// of `ignore_patterns`. Empty patterns are skipped.
pub fn diff_ignoring<S: AsRef<str>>(
    old_text: &str,
    new_text: &str,
    ignore_patterns: &[S],
) -> LineDiff {
    let patterns: Vec<&str> = ignore_patterns
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.is_empty())
        .collect();

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let hunks = compute_hunks(&old_lines, &new_lines)
        .into_iter()
        .filter(|hunk| !hunk.is_ignorable(&patterns))
        .collect();

    LineDiff { hunks }
}

/// Computes the hunks between two line slices.
///
/// Runs of lines that match are collected first, then every gap between two
/// runs becomes a hunk.
fn compute_hunks(old: &[&str], new: &[&str]) -> Vec<Hunk> {
    let mut myers = Myers::new(old, new);
    myers.conquer(0..old.len(), 0..new.len());

    let mut hunks = Vec::new();
    let (mut i, mut j) = (0, 0);
    let end = (old.len(), new.len(), 0);

    for (old_at, new_at, len) in myers.matches.into_iter().chain(std::iter::once(end)) {
        if old_at > i || new_at > j {
            hunks.push(Hunk {
                old_start: i,
                old_lines: old[i..old_at].iter().map(|l| l.to_string()).collect(),
                new_start: j,
                new_lines: new[j..new_at].iter().map(|l| l.to_string()).collect(),
            });
        }
        i = old_at + len;
        j = new_at + len;
    }

    hunks
}

/// Furthest-reaching x per diagonal `k`, indexed from `-offset`.
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

fn common_prefix_len(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[&str], b: &[&str]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

/// Myers' O(ND) diff in linear space.
///
/// Each step finds the middle snake of the remaining edit graph and recurses
/// on both halves. Memory stays proportional to the input however far apart
/// the changes are.
struct Myers<'a> {
    old: &'a [&'a str],
    new: &'a [&'a str],
    vf: Frontier,
    vb: Frontier,
    /// Matching runs as `(old index, new index, length)`, in order.
    matches: Vec<(usize, usize, usize)>,
}

impl<'a> Myers<'a> {
    fn new(old: &'a [&'a str], new: &'a [&'a str]) -> Self {
        let max_d = max_d(old.len(), new.len());
        Self {
            old,
            new,
            vf: Frontier::new(max_d),
            vb: Frontier::new(max_d),
            matches: Vec::new(),
        }
    }

    fn conquer(&mut self, mut old: Range<usize>, mut new: Range<usize>) {
        let prefix = common_prefix_len(&self.old[old.clone()], &self.new[new.clone()]);
        if prefix > 0 {
            self.matches.push((old.start, new.start, prefix));
        }
        old.start += prefix;
        new.start += prefix;

        let suffix = common_suffix_len(&self.old[old.clone()], &self.new[new.clone()]);
        old.end -= suffix;
        new.end -= suffix;

        if !old.is_empty() && !new.is_empty() {
            if let Some((x, y)) = self.middle_snake(old.clone(), new.clone()) {
                self.conquer(old.start..x, new.start..y);
                self.conquer(x..old.end, y..new.end);
            }
        }

        if suffix > 0 {
            self.matches.push((old.end, new.end, suffix));
        }
    }

    fn middle_snake(&mut self, old: Range<usize>, new: Range<usize>) -> Option<(usize, usize)> {
        let n = old.len();
        let m = new.len();
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;

        self.vf[1] = 0;
        self.vb[1] = 0;

        for d in 0..max_d(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.vf[k - 1] < self.vf[k + 1]) {
                    self.vf[k + 1]
                } else {
                    self.vf[k - 1] + 1
                };
                let y = (x as isize - k) as usize;
                let (x0, y0) = (x, y);

                if x < n && y < m {
                    x += common_prefix_len(
                        &self.old[old.start + x..old.end],
                        &self.new[new.start + y..new.end],
                    );
                }
                self.vf[k] = x;

                if odd && (k - delta).abs() <= d - 1 && self.vf[k] + self.vb[-(k - delta)] >= n {
                    return Some((old.start + x0, new.start + y0));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.vb[k - 1] < self.vb[k + 1]) {
                    self.vb[k + 1]
                } else {
                    self.vb[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;

                if x < n && y < m {
                    let run = common_suffix_len(
                        &self.old[old.start..old.start + n - x],
                        &self.new[new.start..new.start + m - y],
                    );
                    x += run;
                    y += run;
                }
                self.vb[k] = x;

                if !odd && (k - delta).abs() <= d && self.vb[k] + self.vf[-(k - delta)] >= n {
                    return Some((old.start + n - x, new.start + m - y));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_unchanged() {
        let text = "<html>\n<body>Hello</body>\n</html>";
        let result = diff(text, text);
        assert!(!result.changed());
        assert_eq!(result.render(), "");
        assert!(result.records().is_empty());
    }

    #[test]
    fn test_empty_texts_unchanged() {
        assert!(!diff("", "").changed());
    }

    #[test]
    fn test_single_line_change() {
        let result = diff("a\nb\nc", "a\nB\nc");
        assert_eq!(result.hunks().len(), 1);
        assert_eq!(result.render(), "2c2\n< b\n---\n> B\n");
        assert_eq!(
            result.records(),
            vec![ReplacementRecord {
                old_block: "b".to_string(),
                new_block: "B".to_string(),
            }]
        );
    }

    #[test]
    fn test_multi_line_change_range() {
        let result = diff("a\nb\nc\nd", "a\nx\ny\nd");
        assert_eq!(result.render(), "2,3c2,3\n< b\n< c\n---\n> x\n> y\n");
    }

    #[test]
    fn test_insertion_and_deletion() {
        let added = diff("a\nc", "a\nb\nc");
        assert_eq!(added.render(), "1a2\n> b\n");

        let removed = diff("a\nb\nc", "a\nc");
        assert_eq!(removed.render(), "2d1\n< b\n");
    }

    #[test]
    fn test_separate_hunks() {
        let result = diff("a\n1\nb\nc\n2\nd", "a\n3\nb\nc\n4\nd");
        assert_eq!(result.hunks().len(), 2);
        assert_eq!(result.hunks()[0].old_start, 1);
        assert_eq!(result.hunks()[1].old_start, 4);
    }

    #[test]
    fn test_crlf_lines_match_lf() {
        assert!(!diff("a\r\nb\r\n", "a\nb\n").changed());
    }

    #[test]
    fn test_ignore_suppresses_noise_hunk() {
        let result = diff_ignoring("Hits: 10\nWelcome", "Hits: 11\nWelcome", &["Hits: "]);
        assert!(!result.changed());
        assert_eq!(result.render(), "");
    }

    #[test]
    fn test_ignore_keeps_mixed_hunk() {
        let result = diff_ignoring("Hits: 10\nWelcome", "Hits: 11\nGoodbye", &["Hits: "]);
        assert!(result.changed());
        let rendered = result.render();
        assert!(rendered.contains("< Welcome"));
        assert!(rendered.contains("> Goodbye"));
    }

    #[test]
    fn test_empty_ignore_pattern_is_skipped() {
        let result = diff_ignoring("a", "b", &[""]);
        assert!(result.changed());
    }

    #[test]
    fn test_hunk_is_ignorable_requires_every_line() {
        let hunk = Hunk {
            old_start: 0,
            old_lines: vec!["Views: 1".to_string()],
            new_start: 0,
            new_lines: vec!["Views: 2".to_string(), "Extra".to_string()],
        };
        assert!(!hunk.is_ignorable(&["Views: "]));
        assert!(hunk.is_ignorable(&["Views: ", "Extra"]));
        assert!(!hunk.is_ignorable(&[]));
    }

    #[test]
    fn test_far_apart_changes_in_large_page() {
        let old: Vec<String> = (0..30_000).map(|i| format!("<p>line {}</p>", i)).collect();
        let mut new = old.clone();
        new[0] = "<p>clock 10:02</p>".to_string();
        new[29_999] = "<p>visitors 42</p>".to_string();

        let start = std::time::Instant::now();
        let result = diff(&old.join("\n"), &new.join("\n"));
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(result.hunks().len(), 2);
        assert_eq!(result.hunks()[0].render(), "1c1\n< <p>line 0</p>\n---\n> <p>clock 10:02</p>\n");
        assert_eq!(result.hunks()[1].old_start, 29_999);
        assert_eq!(result.hunks()[1].new_lines, vec!["<p>visitors 42</p>".to_string()]);
    }

    #[test]
    fn test_interleaved_edits_keep_common_lines() {
        let result = diff("a\nb\nc\nd\ne\nf", "x\nb\nd\ny\nf\nz");
        let rendered = result.render();
        assert!(!rendered.contains("< b"));
        assert!(!rendered.contains("< d"));
        assert!(!rendered.contains("< f"));
        assert!(rendered.contains("> z"));
    }
}
