//! Loading the list of monitored pages.
//!
//! The page list is a CSV file with one page per row:
//!
//! ```text
//! # name, url, learning wait in seconds (optional)
//! ubisoft, free.ubisoft.com
//! status, https://status.example.com, 10
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A row that cannot be
//! turned into a [`Page`] is rejected on its own; the remaining rows still load.

use std::collections::HashSet;
use std::fs;
use std::mem::take;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::page::Page;

/// A row that was skipped while loading the page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// One-based line number in the source file.
    pub line: usize,
    /// Why the row was rejected.
    pub reason: String,
}

/// Pages loaded from a configuration source.
#[derive(Debug, Default)]
pub struct PageList {
    /// Pages in file order.
    pub pages: Vec<Page>,
    /// Rows that were rejected.
    pub rejected: Vec<RejectedRow>,
}

/// Reads and parses the page list at `path`.
///
/// # Errors
/// Returns [`CoreError::ConfigNotFound`] when the file does not exist.
pub fn load_pages(path: &Path) -> Result<PageList> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let list = parse_pages(&content);
    debug!(
        path = %path.display(),
        loaded = list.pages.len(),
        rejected = list.rejected.len(),
        "loaded page list"
    );
    Ok(list)
}

/// Creates an empty page list file at `path`, creating parent directories.
pub fn create_empty_pages_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, "# name, url, learning wait in seconds (optional)\n")?;
    Ok(())
}

/// Parses page list content.
pub fn parse_pages(content: &str) -> PageList {
    let mut list = PageList::default();
    let mut seen = HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_row(&split_row(trimmed)) {
            Ok(page) => {
                if !seen.insert(page.name().to_string()) {
                    warn!(line = line_no, page = %page.name(), "duplicate page name, row skipped");
                    list.rejected.push(RejectedRow {
                        line: line_no,
                        reason: format!("duplicate page name '{}'", page.name()),
                    });
                    continue;
                }
                list.pages.push(page);
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "rejecting page row");
                list.rejected.push(RejectedRow {
                    line: line_no,
                    reason: e.to_string(),
                });
            }
        }
    }

    list
}

fn parse_row(fields: &[String]) -> Result<Page> {
    let name = fields.first().map(String::as_str).unwrap_or_default();
    let url = fields
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| CoreError::Configuration(format!("row for '{}' has no url", name)))?;

    let page = Page::new(name, url)?;

    match fields.get(2).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) => Ok(page.with_learning_wait(Duration::from_secs(secs))),
            Err(_) => {
                warn!(page = %page.name(), value = raw, "invalid learning wait, using default");
                Ok(page)
            }
        },
        None => Ok(page),
    }
}

/// Splits one CSV line into trimmed fields, honouring double quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(take(&mut field).trim().to_string()),
            _ => field.push(ch),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
