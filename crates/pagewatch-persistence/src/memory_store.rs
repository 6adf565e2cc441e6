//! In-memory snapshot store.

use std::collections::HashMap;

use pagewatch_core::SnapshotSlot;

use crate::error::Result;
use crate::snapshot::{Snapshot, SnapshotStore};

/// Snapshot store that lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: HashMap<(String, SnapshotSlot), Snapshot>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots across all pages.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&mut self, page: &str, slot: SnapshotSlot, text: &str) -> Result<()> {
        self.slots
            .insert((page.to_string(), slot), Snapshot::new(slot, text));
        Ok(())
    }

    fn load_snapshot(&self, page: &str, slot: SnapshotSlot) -> Result<Option<Snapshot>> {
        Ok(self.slots.get(&(page.to_string(), slot)).cloned())
    }

    fn clear(&mut self, page: &str) -> Result<()> {
        self.slots.retain(|(name, _), _| name != page);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slots_load_none() {
        let store = MemorySnapshotStore::new();
        assert!(store.load("a", SnapshotSlot::Previous).unwrap().is_none());
        assert!(store.load("a", SnapshotSlot::Current).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_slot() {
        let mut store = MemorySnapshotStore::new();
        store.save("a", SnapshotSlot::Current, "one").unwrap();
        store.save("a", SnapshotSlot::Current, "two").unwrap();

        assert_eq!(store.load("a", SnapshotSlot::Current).unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rotate_keeps_current() {
        let mut store = MemorySnapshotStore::new();
        store.save("a", SnapshotSlot::Previous, "old").unwrap();
        store.save("a", SnapshotSlot::Current, "new").unwrap();
        store.rotate("a").unwrap();

        assert_eq!(store.load("a", SnapshotSlot::Previous).unwrap().as_deref(), Some("new"));
        assert_eq!(store.load("a", SnapshotSlot::Current).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_rotate_without_current_is_noop() {
        let mut store = MemorySnapshotStore::new();
        store.save("a", SnapshotSlot::Previous, "old").unwrap();
        store.rotate("a").unwrap();

        assert_eq!(store.load("a", SnapshotSlot::Previous).unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn test_pages_are_isolated() {
        let mut store = MemorySnapshotStore::new();
        store.save("a", SnapshotSlot::Current, "a-body").unwrap();
        store.save("b", SnapshotSlot::Current, "b-body").unwrap();
        store.clear("a").unwrap();

        assert!(store.load("a", SnapshotSlot::Current).unwrap().is_none());
        assert_eq!(store.load("b", SnapshotSlot::Current).unwrap().as_deref(), Some("b-body"));
    }
}
