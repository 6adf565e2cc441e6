//! Program assembly: pages, notifier, monitors, and the run loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pagewatch_core::config;
use pagewatch_core::{create_empty_pages_file, load_pages, CoreError, Page};
use pagewatch_persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use pagewatch_runtime::{
    Fetcher, HttpFetcher, LogNotifier, MonitorConfig, Notifier, PageMonitor, Runtime,
    RuntimeEvent,
};
use pagewatch_telegram::{Credentials, TelegramNotifier};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::cli::Cli;
use crate::error::Result;

/// Tokens file looked up in the working directory before the config directory.
const LOCAL_TOKENS_FILE: &str = "telegram_tokens.json";

/// Loads the page list.
///
/// A missing file is replaced by an empty one and `None` is returned so the
/// caller can stop and let the user fill it in.
pub fn load_page_list(path: &Path) -> Result<Option<Vec<Page>>> {
    match load_pages(path) {
        Ok(list) => {
            for row in &list.rejected {
                warn!(line = row.line, reason = %row.reason, "skipped page row");
            }
            info!(loaded = list.pages.len(), rejected = list.rejected.len(), "loaded pages");
            Ok(Some(list.pages))
        }
        Err(CoreError::ConfigNotFound(path)) => {
            error!(path = %path.display(), "configuration file does not exist, creating an empty one");
            create_empty_pages_file(&path)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn tokens_file_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from(LOCAL_TOKENS_FILE), config::telegram_tokens_file()]
}

/// Chooses the notifier: Telegram when credentials are available, the log otherwise.
pub fn build_notifier(tokens_files: &[PathBuf]) -> Arc<dyn Notifier> {
    let tokens_file = tokens_files
        .iter()
        .find(|p| p.exists())
        .cloned()
        .unwrap_or_else(config::telegram_tokens_file);

    match Credentials::load(&tokens_file) {
        Ok(Some(credentials)) => {
            info!(chat_id = credentials.chat_id, "sending notifications to Telegram");
            Arc::new(TelegramNotifier::new(&credentials))
        }
        Ok(None) => {
            info!("no Telegram credentials, notifications go to the log");
            Arc::new(LogNotifier)
        }
        Err(e) => {
            warn!(error = %e, "unusable Telegram credentials, notifications go to the log");
            Arc::new(LogNotifier)
        }
    }
}

/// Creates one monitor per page.
///
/// Snapshots live under `snapshots_dir`, or in memory when it is `None`.
pub fn build_monitors(
    pages: Vec<Page>,
    fetcher: Arc<dyn Fetcher>,
    snapshots_dir: Option<&Path>,
    config: &MonitorConfig,
) -> Result<Vec<PageMonitor>> {
    pages
        .into_iter()
        .map(|page| -> Result<PageMonitor> {
            let store: Box<dyn SnapshotStore> = match snapshots_dir {
                Some(dir) => Box::new(FileSnapshotStore::new(dir)?),
                None => Box::new(MemorySnapshotStore::new()),
            };
            Ok(PageMonitor::new(page, Arc::clone(&fetcher), store, config.clone()))
        })
        .collect()
}

async fn log_events(mut events: broadcast::Receiver<RuntimeEvent>) {
    loop {
        match events.recv().await {
            Ok(RuntimeEvent::Changed { page, .. }) => info!(page = %page, "change reported"),
            Ok(RuntimeEvent::FetchFailed { page, error }) => {
                warn!(page = %page, error = %error, "page skipped this cycle")
            }
            Ok(event) => debug!(page = %event.page(), ?event, "runtime event"),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!(missed, "event log lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Runs the monitor until interrupted.
pub async fn run(cli: Cli) -> Result<()> {
    let Some(pages) = load_page_list(&cli.config)? else {
        println!(
            "Created {}. Add one `name, url[, learning wait seconds]` row per page and start again.",
            cli.config.display()
        );
        return Ok(());
    };
    if pages.is_empty() {
        warn!(path = %cli.config.display(), "no pages configured");
    }

    let runtime_config = cli.runtime_config();
    info!(
        poll_interval_secs = runtime_config.poll_interval.as_secs(),
        liveness = ?runtime_config.liveness_time.map(|t| t.format("%H:%M").to_string()),
        "configured"
    );

    let snapshots_dir = if cli.memory {
        None
    } else {
        let state_dir = cli.state_dir();
        config::ensure_all_dirs(&state_dir)?;
        Some(config::snapshots_dir_in(&state_dir))
    };

    let notifier = build_notifier(&tokens_file_candidates());
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(runtime_config.request_timeout)?);
    let monitors = build_monitors(
        pages,
        fetcher,
        snapshots_dir.as_deref(),
        &cli.monitor_config(),
    )?;

    let mut runtime = Runtime::new(runtime_config, notifier);
    tokio::spawn(log_events(runtime.subscribe()));
    runtime.start(monitors).await?;

    tokio::signal::ctrl_c().await?;
    info!("interrupted");
    runtime.shutdown().await?;

    Ok(())
}
