//! Snapshot records and the two-slot store contract.

use chrono::{DateTime, Utc};
use pagewatch_core::SnapshotSlot;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored page body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Slot this snapshot occupies.
    pub slot: SnapshotSlot,
    /// Response body text.
    pub text: String,
    /// When the body was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(slot: SnapshotSlot, text: impl Into<String>) -> Self {
        Self {
            slot,
            text: text.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Storage holding at most one `previous` and one `current` snapshot per page.
///
/// Implementations only provide the raw slot operations; [`SnapshotStore::load`]
/// and [`SnapshotStore::rotate`] are derived from them.
pub trait SnapshotStore: Send + Sync {
    /// Stores `text` in `slot` for `page`, replacing whatever was there.
    fn save(&mut self, page: &str, slot: SnapshotSlot, text: &str) -> Result<()>;

    /// Loads the full snapshot record in `slot`, if any.
    fn load_snapshot(&self, page: &str, slot: SnapshotSlot) -> Result<Option<Snapshot>>;

    /// Drops both slots for `page`.
    fn clear(&mut self, page: &str) -> Result<()>;

    /// Loads the text in `slot`, if any.
    fn load(&self, page: &str, slot: SnapshotSlot) -> Result<Option<String>> {
        Ok(self.load_snapshot(page, slot)?.map(|s| s.text))
    }

    /// Copies `current` into `previous`.
    ///
    /// When `current` is empty nothing changes, so an existing `previous`
    /// survives.
    fn rotate(&mut self, page: &str) -> Result<()> {
        match self.load(page, SnapshotSlot::Current)? {
            Some(text) => self.save(page, SnapshotSlot::Previous, &text),
            None => Ok(()),
        }
    }
}
