//! Async runtime for Pagewatch.
//!
//! This crate drives the change-detection core against live pages:
//! - `PageMonitor` - learns one page's noise profile and runs its poll cycle
//! - `PagePoller` - polls every monitor once per interval
//! - `Runtime` - main entry point combining the poller and the daily liveness notice
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagewatch_core::Page;
//! use pagewatch_persistence::MemorySnapshotStore;
//! use pagewatch_runtime::{HttpFetcher, LogNotifier, MonitorConfig, PageMonitor, Runtime, RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!     let fetcher = Arc::new(HttpFetcher::new(config.request_timeout)?);
//!     let monitor = PageMonitor::new(
//!         Page::new("news", "news.example.com")?,
//!         fetcher,
//!         Box::new(MemorySnapshotStore::new()),
//!         MonitorConfig::default(),
//!     );
//!
//!     let mut runtime = Runtime::new(config, Arc::new(LogNotifier));
//!     let mut events = runtime.subscribe();
//!     runtime.start(vec![monitor]).await?;
//!
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     tokio::signal::ctrl_c().await?;
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Key Concepts
//!
//! ## PageMonitor
//!
//! Each monitor moves through `Uninitialized -> Learning -> Ready`. A ready
//! poll fetches the page, compares it with the previous snapshot through the
//! noise profile, and rotates the snapshots. A missing snapshot sends the
//! monitor back to learning instead of reporting a change.
//!
//! The baseline for each poll is the previous poll's fetch, so a change that
//! builds up slowly over many polls is only seen one step at a time.
//!
//! ## Fetching
//!
//! Every fetch goes through a bounded `RetryPolicy`. When it gives up the
//! page is skipped for that cycle and its state is left as it was.

pub mod config;
pub mod error;
pub mod event;
pub mod fetcher;
pub mod liveness;
pub mod monitor;
pub mod notifier;
pub mod poller;
pub mod retry;
pub mod runtime;

#[cfg(test)]
mod fakes;

pub use config::{MonitorConfig, RelearnPolicy, RuntimeConfig};
pub use error::{FetchError, NotifyError, Result, RuntimeError};
pub use event::RuntimeEvent;
pub use fetcher::{Fetcher, HttpFetcher};
pub use liveness::LivenessAlert;
pub use monitor::{MonitorState, PageMonitor, PollOutcome};
pub use notifier::{change_message, deliver, LogNotifier, Notifier};
pub use poller::PagePoller;
pub use retry::{fetch_with_retry, FetchExhausted, RetryPolicy};
pub use runtime::Runtime;
