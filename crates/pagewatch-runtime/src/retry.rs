//! Bounded retry with exponential backoff for page fetches.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::fetcher::Fetcher;

/// How failed fetches are retried.
///
/// The delay after the `n`th failure is `initial_delay * multiplier^(n-1)`,
/// capped at `max_delay`. Timeouts and network errors use
/// `connectivity_multiplier` instead, backing off faster while the host is
/// unreachable.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Growth factor for empty bodies and bad statuses.
    pub multiplier: f64,
    /// Growth factor for timeouts and network errors.
    pub connectivity_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            connectivity_multiplier: 3.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that makes a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the total number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay after the first failure.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Backoff to wait after `failures` consecutive failures, the last being `error`.
    pub fn delay_for(&self, failures: u32, error: &FetchError) -> Duration {
        let factor = if error.is_connectivity() {
            self.connectivity_multiplier
        } else {
            self.multiplier
        };
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * factor.powi(exponent);
        let cap = self.max_delay.as_secs_f64();

        if secs.is_finite() && secs >= 0.0 && secs < cap {
            Duration::from_secs_f64(secs)
        } else {
            self.max_delay
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// A fetch that failed on every attempt the policy allowed.
#[derive(Debug, Clone, Error)]
#[error("fetching {url} failed after {attempts} attempt(s): {last_error}")]
pub struct FetchExhausted {
    /// URL that was being fetched.
    pub url: String,
    /// Attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    pub last_error: FetchError,
}

/// Fetches `url`, retrying transient failures according to `policy`.
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchExhausted> {
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match fetcher.fetch(url).await {
            Ok(body) => {
                if attempt > 1 {
                    debug!(url = %url, attempt, "fetch succeeded after retry");
                }
                return Ok(body);
            }
            Err(error) if attempt >= max_attempts => {
                return Err(FetchExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last_error: error,
                });
            }
            Err(error) => {
                let delay = policy.delay_for(attempt, &error);
                warn!(
                    url = %url,
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
