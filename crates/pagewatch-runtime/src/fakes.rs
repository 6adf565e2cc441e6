//! Scripted test doubles for the fetcher and notifier seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pagewatch_core::SnapshotSlot;
use pagewatch_persistence::{MemorySnapshotStore, Snapshot, SnapshotStore};

use crate::error::{FetchError, NotifyError};
use crate::fetcher::Fetcher;
use crate::notifier::Notifier;

/// Returns scripted responses in order; errors once the script runs out.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<String, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn bodies(bodies: &[&str]) -> Self {
        Self::new(bodies.iter().map(|b| Ok(b.to_string())).collect())
    }

    pub fn push(&self, response: Result<String, FetchError>) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".into())))
    }
}

/// Records every message it is asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Send("transport down".into()));
        }
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Memory store that can lose its `previous` slot once on demand.
#[derive(Default)]
pub struct LossyStore {
    inner: MemorySnapshotStore,
    drop_previous: Arc<Mutex<bool>>,
}

impl LossyStore {
    /// Handle that makes the next `previous` load come back empty.
    pub fn drop_handle(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.drop_previous)
    }
}

impl SnapshotStore for LossyStore {
    fn save(&mut self, page: &str, slot: SnapshotSlot, text: &str) -> pagewatch_persistence::Result<()> {
        self.inner.save(page, slot, text)
    }

    fn load_snapshot(
        &self,
        page: &str,
        slot: SnapshotSlot,
    ) -> pagewatch_persistence::Result<Option<Snapshot>> {
        let mut drop_previous = self.drop_previous.lock().unwrap();
        if slot == SnapshotSlot::Previous && *drop_previous {
            *drop_previous = false;
            return Ok(None);
        }
        self.inner.load_snapshot(page, slot)
    }

    fn clear(&mut self, page: &str) -> pagewatch_persistence::Result<()> {
        self.inner.clear(page)
    }
}
