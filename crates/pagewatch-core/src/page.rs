//! Page identity and snapshot slots.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// One of the two snapshot holders kept per monitored page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSlot {
    /// The text the next poll is compared against.
    Previous,
    /// The most recently fetched text.
    Current,
}

impl SnapshotSlot {
    /// Returns the slot name used in logs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSlot::Previous => "previous",
            SnapshotSlot::Current => "current",
        }
    }
}

impl fmt::Display for SnapshotSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored web page.
///
/// `name` is the unique key for the page; `url` is always scheme-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    name: String,
    url: String,
    learning_wait: Option<Duration>,
}

impl Page {
    /// Creates a page, normalising the url with [`format_url`].
    pub fn new(name: impl Into<String>, url: &str) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Configuration("page name is empty".to_string()));
        }

        Ok(Self {
            url: format_url(url)?,
            name,
            learning_wait: None,
        })
    }

    /// Overrides the wait between the two learning-phase fetches.
    pub fn with_learning_wait(mut self, wait: Duration) -> Self {
        self.learning_wait = Some(wait);
        self
    }

    /// Returns the page name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scheme-qualified url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the per-page learning wait, if one was configured.
    pub fn learning_wait(&self) -> Option<Duration> {
        self.learning_wait
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Normalises a url so it always starts with `http://` or `https://`.
///
/// Urls without a scheme get `https://` prepended. Empty urls and urls that do
/// not parse as absolute http(s) urls are rejected.
pub fn format_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Configuration("url is empty".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let formatted = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&formatted)
        .map_err(|e| CoreError::Configuration(format!("invalid url '{}': {}", trimmed, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(CoreError::Configuration(format!("url '{}' has no host", trimmed)));
    }

    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_url_prepends_https() {
        assert_eq!(format_url("free.ubisoft.com").unwrap(), "https://free.ubisoft.com");
        assert_eq!(format_url("  localhost  ").unwrap(), "https://localhost");
    }

    #[test]
    fn test_format_url_keeps_existing_scheme() {
        assert_eq!(format_url("http://example.com/a").unwrap(), "http://example.com/a");
        assert_eq!(format_url("https://example.com").unwrap(), "https://example.com");
        assert_eq!(format_url("HTTPS://example.com").unwrap(), "HTTPS://example.com");
    }

    #[test]
    fn test_format_url_rejects_empty() {
        assert!(matches!(format_url(""), Err(CoreError::Configuration(_))));
        assert!(matches!(format_url("   "), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_format_url_rejects_garbage() {
        assert!(matches!(format_url("http://"), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(" Ubi ", "free.ubisoft.com").unwrap();
        assert_eq!(page.name(), "Ubi");
        assert_eq!(page.url(), "https://free.ubisoft.com");
        assert!(page.learning_wait().is_none());

        let page = page.with_learning_wait(Duration::from_secs(2));
        assert_eq!(page.learning_wait(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_page_rejects_empty_name() {
        assert!(Page::new("", "example.com").is_err());
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(SnapshotSlot::Previous.to_string(), "previous");
        assert_eq!(SnapshotSlot::Current.as_str(), "current");
    }
}
