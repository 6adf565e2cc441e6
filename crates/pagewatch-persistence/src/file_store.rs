//! File-backed snapshot store.

use std::fs;
use std::path::PathBuf;

use pagewatch_core::SnapshotSlot;
use tracing::{debug, warn};

use crate::atomic::{atomic_write_json, read_json_optional, remove_if_exists};
use crate::error::{PersistenceError, Result};
use crate::snapshot::{Snapshot, SnapshotStore};

/// Stores each slot as a JSON file so snapshots survive restarts.
///
/// ```text
/// snapshots/
/// ├── news.previous.json
/// └── news.current.json
/// ```
///
/// Page names are reduced to a safe file stem. Names that had to be altered
/// get a short hash suffix so two different names never share a file.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Creates a store rooted at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| PersistenceError::DirectoryError {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { dir })
    }

    /// Returns the directory snapshots are written to.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn slot_path(&self, page: &str, slot: SnapshotSlot) -> PathBuf {
        self.dir.join(format!("{}.{}.json", file_stem(page), slot))
    }
}

fn file_stem(page: &str) -> String {
    let sanitized: String = page
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized == page && !sanitized.is_empty() {
        sanitized
    } else {
        format!("{}-{:08x}", sanitized, fnv1a(page))
    }
}

// 32-bit FNV-1a; stable across builds so file names do not move.
fn fnv1a(input: &str) -> u32 {
    input.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&mut self, page: &str, slot: SnapshotSlot, text: &str) -> Result<()> {
        let path = self.slot_path(page, slot);
        atomic_write_json(&path, &Snapshot::new(slot, text))?;
        debug!(page = %page, slot = %slot, bytes = text.len(), "snapshot saved");
        Ok(())
    }

    fn load_snapshot(&self, page: &str, slot: SnapshotSlot) -> Result<Option<Snapshot>> {
        let path = self.slot_path(page, slot);
        let snapshot: Option<Snapshot> = read_json_optional(&path)?;
        match snapshot {
            Some(s) if s.slot != slot => {
                warn!(page = %page, slot = %slot, stored = %s.slot, "snapshot file holds wrong slot, ignoring");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn clear(&mut self, page: &str) -> Result<()> {
        remove_if_exists(&self.slot_path(page, SnapshotSlot::Previous))?;
        remove_if_exists(&self.slot_path(page, SnapshotSlot::Current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_slot() {
        let dir = tempdir().unwrap();
        let mut store = FileSnapshotStore::new(dir.path()).unwrap();

        store.save("news", SnapshotSlot::Current, "<h1>Hi</h1>").unwrap();

        let snap = store.load_snapshot("news", SnapshotSlot::Current).unwrap().unwrap();
        assert_eq!(snap.text, "<h1>Hi</h1>");
        assert_eq!(snap.slot, SnapshotSlot::Current);
        assert!(store.load("news", SnapshotSlot::Previous).unwrap().is_none());
        assert!(dir.path().join("news.current.json").exists());
    }

    #[test]
    fn test_snapshots_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut store = FileSnapshotStore::new(dir.path()).unwrap();
            store.save("news", SnapshotSlot::Current, "body").unwrap();
            store.rotate("news").unwrap();
        }

        let store = FileSnapshotStore::new(dir.path()).unwrap();
        assert_eq!(
            store.load("news", SnapshotSlot::Previous).unwrap().as_deref(),
            Some("body")
        );
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("snapshots");
        let store = FileSnapshotStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_unsafe_names_do_not_collide() {
        assert_eq!(file_stem("news"), "news");
        assert_ne!(file_stem("a/b"), file_stem("a_b"));
        assert_ne!(file_stem("a/b"), file_stem("a b"));
        assert!(!file_stem("../etc").contains('/'));
    }

    #[test]
    fn test_clear_removes_both_slots() {
        let dir = tempdir().unwrap();
        let mut store = FileSnapshotStore::new(dir.path()).unwrap();
        store.save("news", SnapshotSlot::Previous, "a").unwrap();
        store.save("news", SnapshotSlot::Current, "b").unwrap();

        store.clear("news").unwrap();

        assert!(store.load("news", SnapshotSlot::Previous).unwrap().is_none());
        assert!(store.load("news", SnapshotSlot::Current).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("news.current.json"), "{").unwrap();

        assert!(store.load("news", SnapshotSlot::Current).is_err());
    }
}
