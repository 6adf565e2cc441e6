//! Page poller driving every monitor on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::event::RuntimeEvent;
use crate::monitor::{MonitorState, PageMonitor, PollOutcome};
use crate::notifier::{change_message, deliver, Notifier};

/// Polls all page monitors once per interval.
///
/// Monitors within one cycle are polled concurrently. The shutdown signal is
/// checked between cycles; a cycle in progress always runs to completion.
pub struct PagePoller {
    monitors: Vec<PageMonitor>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<RuntimeEvent>,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl PagePoller {
    /// Creates a new page poller.
    pub fn new(
        monitors: Vec<PageMonitor>,
        notifier: Arc<dyn Notifier>,
        events: broadcast::Sender<RuntimeEvent>,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            monitors,
            notifier,
            events,
            poll_interval,
            shutdown,
        }
    }

    /// Returns the monitors, in configuration order.
    pub fn monitors(&self) -> &[PageMonitor] {
        &self.monitors
    }

    /// Consumes the poller, returning its monitors.
    pub fn into_monitors(self) -> Vec<PageMonitor> {
        self.monitors
    }

    /// Learns every monitor that has no profile yet, then polls until shutdown.
    pub async fn run(&mut self) {
        let mut shutdown = self.shutdown.clone();
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            pages = self.monitors.len(),
            poll_interval_secs = self.poll_interval.as_secs(),
            "starting page poller"
        );

        self.learn_all().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    self.poll_all().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("page poller stopped");
    }

    /// Runs the learning phase for every uninitialized monitor.
    pub async fn learn_all(&mut self) {
        let events = &self.events;
        let pending = self
            .monitors
            .iter_mut()
            .filter(|m| m.state() == MonitorState::Uninitialized)
            .map(|monitor| async move {
                let page = monitor.page().name().to_string();
                match monitor.learn().await {
                    Ok(patterns) => {
                        info!(page = %page, patterns, "learned page");
                        emit(events, RuntimeEvent::Learned { page, patterns });
                    }
                    Err(e) => {
                        warn!(page = %page, error = %e, "learning failed, will retry next cycle");
                        emit(events, RuntimeEvent::FetchFailed {
                            page,
                            error: e.to_string(),
                        });
                    }
                }
            });
        join_all(pending).await;
    }

    /// Polls every monitor once, concurrently.
    pub async fn poll_all(&mut self) {
        let notifier = self.notifier.as_ref();
        let events = &self.events;
        join_all(
            self.monitors
                .iter_mut()
                .map(|monitor| poll_one(monitor, notifier, events)),
        )
        .await;
    }
}

async fn poll_one(
    monitor: &mut PageMonitor,
    notifier: &dyn Notifier,
    events: &broadcast::Sender<RuntimeEvent>,
) {
    let page = monitor.page().name().to_string();

    match monitor.poll().await {
        Ok(PollOutcome::Changed(report)) => {
            deliver(notifier, &change_message(&page, &report.detail)).await;
            emit(events, RuntimeEvent::Changed {
                page,
                detail: report.detail,
            });
        }
        Ok(PollOutcome::Unchanged) => emit(events, RuntimeEvent::Unchanged { page }),
        Ok(PollOutcome::Learned { patterns }) => {
            emit(events, RuntimeEvent::Learned { page, patterns })
        }
        Ok(PollOutcome::Relearned { patterns }) => {
            emit(events, RuntimeEvent::Relearned { page, patterns })
        }
        Err(e) => {
            warn!(page = %page, error = %e, "poll skipped");
            emit(events, RuntimeEvent::FetchFailed {
                page,
                error: e.to_string(),
            });
        }
    }
}

fn emit(events: &broadcast::Sender<RuntimeEvent>, event: RuntimeEvent) {
    // No subscribers is fine.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::fakes::{RecordingNotifier, ScriptedFetcher};
    use crate::retry::RetryPolicy;
    use pagewatch_core::Page;
    use pagewatch_persistence::MemorySnapshotStore;

    fn monitor(name: &str, fetcher: Arc<ScriptedFetcher>) -> PageMonitor {
        PageMonitor::new(
            Page::new(name, "example.com").unwrap(),
            fetcher,
            Box::new(MemorySnapshotStore::new()),
            MonitorConfig::new().with_retry(RetryPolicy::no_retry()),
        )
    }

    fn poller(
        monitors: Vec<PageMonitor>,
        notifier: Arc<RecordingNotifier>,
    ) -> (PagePoller, broadcast::Receiver<RuntimeEvent>, watch::Sender<bool>) {
        let (events, rx) = broadcast::channel(64);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = PagePoller::new(
            monitors,
            notifier,
            events,
            Duration::from_secs(60),
            shutdown_rx,
        );
        (poller, rx, shutdown_tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_is_notified() {
        let fetcher = Arc::new(ScriptedFetcher::bodies(&["Welcome", "Welcome", "Goodbye"]));
        let notifier = Arc::new(RecordingNotifier::new());
        let (mut poller, mut rx, _tx) = poller(vec![monitor("news", fetcher)], notifier.clone());

        poller.learn_all().await;
        poller.poll_all().await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("A change on news has been detected."));

        assert!(matches!(rx.recv().await.unwrap(), RuntimeEvent::Learned { .. }));
        assert!(rx.recv().await.unwrap().is_change());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failing_page_does_not_block_others() {
        let good = Arc::new(ScriptedFetcher::bodies(&["a", "a", "a"]));
        let bad = Arc::new(ScriptedFetcher::bodies(&["b", "b"]));
        let notifier = Arc::new(RecordingNotifier::new());
        let (mut poller, mut rx, _tx) = poller(
            vec![monitor("good", good), monitor("bad", bad)],
            notifier.clone(),
        );

        poller.learn_all().await;
        poller.poll_all().await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events.contains(&RuntimeEvent::Unchanged {
            page: "good".to_string()
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, RuntimeEvent::FetchFailed { page, .. } if page == "bad")));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_shutdown() {
        let fetcher = Arc::new(ScriptedFetcher::bodies(&["a", "a"]));
        let notifier = Arc::new(RecordingNotifier::new());
        let (mut poller, _rx, shutdown_tx) = poller(vec![monitor("news", fetcher)], notifier);

        let handle = tokio::spawn(async move {
            poller.run().await;
            poller
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        let poller = result.expect("poller should stop after shutdown signal").unwrap();
        assert_eq!(poller.monitors()[0].state(), MonitorState::Ready);
    }
}
