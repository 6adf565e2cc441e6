//! Per-page monitor: learning phase and poll cycle.

use std::sync::Arc;

use pagewatch_core::{ChangeReport, CoreError, FilteredComparator, NoiseProfile, Page, SnapshotSlot};
use pagewatch_persistence::SnapshotStore;
use tracing::{debug, info, warn};

use crate::config::{MonitorConfig, RelearnPolicy};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::retry::fetch_with_retry;

/// Lifecycle of a [`PageMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No profile learned yet.
    Uninitialized,
    /// Learning is in progress.
    Learning,
    /// Profile learned; polls compare snapshots.
    Ready,
}

/// Result of one [`PageMonitor::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The monitor was uninitialized and ran its first learning phase.
    Learned {
        /// Number of noise patterns learned.
        patterns: usize,
    },
    /// The monitor learned its profile again instead of comparing.
    Relearned {
        /// Number of noise patterns learned.
        patterns: usize,
    },
    /// Only noise changed.
    Unchanged,
    /// A real change was found.
    Changed(ChangeReport),
}

/// Watches a single page.
///
/// Owns the page's snapshot store and noise profile; nothing is shared with
/// other monitors except the fetcher.
pub struct PageMonitor {
    page: Page,
    config: MonitorConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Box<dyn SnapshotStore>,
    profile: NoiseProfile,
    state: MonitorState,
    polls_since_learn: u32,
}

impl PageMonitor {
    /// Creates an uninitialized monitor for `page`.
    pub fn new(
        page: Page,
        fetcher: Arc<dyn Fetcher>,
        store: Box<dyn SnapshotStore>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            page,
            config,
            fetcher,
            store,
            profile: NoiseProfile::new(),
            state: MonitorState::Uninitialized,
            polls_since_learn: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn profile(&self) -> &NoiseProfile {
        &self.profile
    }

    /// Runs the learning phase.
    ///
    /// Fetches the page twice, `learning_wait` apart, stores the samples as
    /// `previous` and `current`, and learns the noise profile from them. The
    /// samples are stored only once both fetches succeed; on failure the
    /// monitor keeps its earlier state, profile and snapshots.
    pub async fn learn(&mut self) -> Result<usize> {
        let prior = self.state;
        self.state = MonitorState::Learning;

        match self.learn_inner().await {
            Ok(patterns) => Ok(patterns),
            Err(e) => {
                self.state = prior;
                Err(e)
            }
        }
    }

    async fn learn_inner(&mut self) -> Result<usize> {
        let name = self.page.name().to_string();
        let wait = self.page.learning_wait().unwrap_or(self.config.learning_wait);

        debug!(page = %name, wait_secs = wait.as_secs_f64(), "learning noise profile");

        let first = fetch_with_retry(self.fetcher.as_ref(), self.page.url(), &self.config.retry).await?;
        tokio::time::sleep(wait).await;
        let second = fetch_with_retry(self.fetcher.as_ref(), self.page.url(), &self.config.retry).await?;

        // Both samples or neither
        self.store.save(&name, SnapshotSlot::Previous, &first)?;
        self.store.save(&name, SnapshotSlot::Current, &second)?;

        self.profile = NoiseProfile::learn_with(&first, &second, &self.config.learning);
        self.state = MonitorState::Ready;
        self.polls_since_learn = 0;

        if self.profile.is_empty() {
            debug!(page = %name, "no noise found");
        } else {
            debug!(page = %name, patterns = self.profile.len(), "noise found");
        }
        Ok(self.profile.len())
    }

    fn relearn_due(&self) -> bool {
        match self.config.relearn {
            RelearnPolicy::Never => false,
            RelearnPolicy::EveryPolls(n) => n > 0 && self.polls_since_learn >= n,
        }
    }

    /// Runs one poll cycle.
    ///
    /// A monitor that is not ready learns instead. In the ready state the page
    /// is fetched, stored as `current`, compared against `previous` through the
    /// noise profile, and then rotated so the fetched text becomes the next
    /// baseline. If the fetch is exhausted the error is returned and nothing
    /// is stored. A snapshot that is missing or cannot be read sends the
    /// monitor back to learning, which rewrites both slots.
    pub async fn poll(&mut self) -> Result<PollOutcome> {
        if self.state != MonitorState::Ready {
            let patterns = self.learn().await?;
            return Ok(PollOutcome::Learned { patterns });
        }

        if self.relearn_due() {
            info!(page = %self.page.name(), polls = self.polls_since_learn, "relearning noise profile");
            let patterns = self.learn().await?;
            return Ok(PollOutcome::Relearned { patterns });
        }

        let body = fetch_with_retry(self.fetcher.as_ref(), self.page.url(), &self.config.retry).await?;

        let name = self.page.name();
        self.store.save(name, SnapshotSlot::Current, &body)?;

        let loaded = self.store.load(name, SnapshotSlot::Previous).and_then(|previous| {
            self.store
                .load(name, SnapshotSlot::Current)
                .map(|current| (previous, current))
        });
        let (previous, current) = match loaded {
            Ok(pair) => pair,
            Err(e) => {
                warn!(page = %name, error = %e, "snapshot unreadable, learning again");
                let patterns = self.learn().await?;
                return Ok(PollOutcome::Relearned { patterns });
            }
        };

        let comparator = FilteredComparator::new(&self.profile);
        let report = match comparator.compare_snapshots(previous.as_deref(), current.as_deref()) {
            Ok(report) => report,
            Err(CoreError::MissingSnapshot(slot)) => {
                warn!(page = %name, slot = %slot, "snapshot missing, learning again");
                let patterns = self.learn().await?;
                return Ok(PollOutcome::Relearned { patterns });
            }
            Err(e) => return Err(e.into()),
        };

        self.store.rotate(name)?;
        self.polls_since_learn = self.polls_since_learn.saturating_add(1);

        if report.changed {
            info!(page = %name, "change detected");
            Ok(PollOutcome::Changed(report))
        } else {
            debug!(page = %name, "no change");
            Ok(PollOutcome::Unchanged)
        }
    }
}
