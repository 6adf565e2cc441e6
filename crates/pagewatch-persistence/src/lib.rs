//! Snapshot persistence for Pagewatch.
//!
//! Every monitored page owns two snapshot slots, `previous` and `current`.
//! The [`SnapshotStore`] trait captures those two-slot semantics; the store
//! behind it may be memory ([`MemorySnapshotStore`]) or files written
//! atomically ([`FileSnapshotStore`]).
//!
//! # Example
//!
//! ```
//! use pagewatch_core::SnapshotSlot;
//! use pagewatch_persistence::{MemorySnapshotStore, SnapshotStore};
//!
//! let mut store = MemorySnapshotStore::new();
//! store.save("news", SnapshotSlot::Current, "<p>hello</p>").unwrap();
//! store.rotate("news").unwrap();
//!
//! let previous = store.load("news", SnapshotSlot::Previous).unwrap();
//! assert_eq!(previous.as_deref(), Some("<p>hello</p>"));
//! ```

pub mod atomic;
pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod snapshot;

pub use error::{PersistenceError, Result};
pub use file_store::FileSnapshotStore;
pub use memory_store::MemorySnapshotStore;
pub use snapshot::{Snapshot, SnapshotStore};
