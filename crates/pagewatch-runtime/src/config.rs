//! Runtime and monitor configuration.

use std::time::Duration;

use chrono::NaiveTime;
use pagewatch_core::LearningConfig;

use crate::retry::RetryPolicy;

/// When a ready monitor learns its noise profile again.
///
/// A missing snapshot always forces relearning regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelearnPolicy {
    /// Keep the profile learned at startup.
    #[default]
    Never,
    /// Relearn after this many polls since the last learning phase.
    EveryPolls(u32),
}

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Time between poll cycles.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Local time of the daily liveness notice; `None` disables it.
    pub liveness_time: Option<NaiveTime>,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2 * 60 * 60),
            request_timeout: Duration::from_secs(30),
            liveness_time: NaiveTime::from_hms_opt(14, 0, 0),
            event_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets or disables the daily liveness notice.
    pub fn with_liveness_time(mut self, time: Option<NaiveTime>) -> Self {
        self.liveness_time = time;
        self
    }

    /// Sets the event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// Configuration shared by page monitors.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Pause between the two learning fetches, unless the page overrides it.
    pub learning_wait: Duration,
    /// Pattern hygiene applied while learning.
    pub learning: LearningConfig,
    /// Retry behaviour for every fetch.
    pub retry: RetryPolicy,
    /// Periodic relearning.
    pub relearn: RelearnPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            learning_wait: Duration::from_secs(5),
            learning: LearningConfig::default(),
            retry: RetryPolicy::default(),
            relearn: RelearnPolicy::Never,
        }
    }
}

impl MonitorConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default learning wait.
    pub fn with_learning_wait(mut self, wait: Duration) -> Self {
        self.learning_wait = wait;
        self
    }

    /// Sets the learning configuration.
    pub fn with_learning(mut self, learning: LearningConfig) -> Self {
        self.learning = learning;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the relearn policy.
    pub fn with_relearn(mut self, relearn: RelearnPolicy) -> Self {
        self.relearn = relearn;
        self
    }
}
