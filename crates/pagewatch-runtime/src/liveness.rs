//! Daily liveness notice.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::notifier::{deliver, Notifier, LIVENESS_MESSAGE};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Time from `now` until the next occurrence of `at`.
///
/// If `now` is exactly `at`, the next occurrence is a day away.
pub fn delay_until(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or(DAY)
}

/// Sends [`LIVENESS_MESSAGE`] once a day at a fixed local time.
pub struct LivenessAlert {
    at: NaiveTime,
    notifier: Arc<dyn Notifier>,
    shutdown: watch::Receiver<bool>,
}

impl LivenessAlert {
    pub fn new(at: NaiveTime, notifier: Arc<dyn Notifier>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            at,
            notifier,
            shutdown,
        }
    }

    /// Runs until the shutdown signal.
    pub async fn run(&mut self) {
        info!(at = %self.at.format("%H:%M"), "daily liveness notice scheduled");

        loop {
            let wait = delay_until(Local::now().naive_local(), self.at);
            debug!(wait_secs = wait.as_secs(), "next liveness notice");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    deliver(self.notifier.as_ref(), LIVENESS_MESSAGE).await;
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("liveness alert stopped");
    }
}
