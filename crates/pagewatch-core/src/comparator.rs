//! Noise-filtered comparison of two page snapshots.

use tracing::trace;

use crate::diff::diff_ignoring;
use crate::error::{CoreError, Result};
use crate::noise::NoiseProfile;
use crate::page::SnapshotSlot;

/// Outcome of comparing a previous snapshot with a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// Whether a difference survived noise filtering.
    pub changed: bool,
    /// Rendered diff of the surviving hunks; empty when unchanged.
    pub detail: String,
}

impl ChangeReport {
    /// A report for content that did not change.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// A report carrying the rendered diff.
    pub fn changed(detail: impl Into<String>) -> Self {
        Self {
            changed: true,
            detail: detail.into(),
        }
    }
}

/// Compares snapshots while ignoring lines matched by a noise profile.
#[derive(Debug, Clone, Copy)]
pub struct FilteredComparator<'a> {
    profile: &'a NoiseProfile,
}

impl<'a> FilteredComparator<'a> {
    /// Creates a comparator over `profile`.
    pub fn new(profile: &'a NoiseProfile) -> Self {
        Self { profile }
    }

    /// Compares two texts.
    pub fn compare(&self, previous: &str, current: &str) -> ChangeReport {
        let result = diff_ignoring(previous, current, self.profile.patterns());
        trace!(
            hunks = result.hunks().len(),
            patterns = self.profile.len(),
            "filtered comparison"
        );

        if result.changed() {
            ChangeReport::changed(result.render())
        } else {
            ChangeReport::unchanged()
        }
    }

    /// Compares two stored snapshots, either of which may be absent.
    ///
    /// A missing snapshot means the comparison cannot be made yet; it is
    /// reported as [`CoreError::MissingSnapshot`], never as "no change".
    pub fn compare_snapshots(
        &self,
        previous: Option<&str>,
        current: Option<&str>,
    ) -> Result<ChangeReport> {
        let previous = previous.ok_or(CoreError::MissingSnapshot(SnapshotSlot::Previous))?;
        let current = current.ok_or(CoreError::MissingSnapshot(SnapshotSlot::Current))?;
        Ok(self.compare(previous, current))
    }
}
