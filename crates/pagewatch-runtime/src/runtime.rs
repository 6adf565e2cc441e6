//! Main runtime manager.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::event::RuntimeEvent;
use crate::liveness::LivenessAlert;
use crate::monitor::PageMonitor;
use crate::notifier::{deliver, Notifier, STARTUP_MESSAGE};
use crate::poller::PagePoller;

/// Runs the page poller and the liveness notice as background tasks.
pub struct Runtime {
    config: RuntimeConfig,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<RuntimeEvent>,
    poller_handle: Option<JoinHandle<Vec<PageMonitor>>>,
    liveness_handle: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    started: bool,
}

impl Runtime {
    /// Create a new runtime with the given configuration.
    pub fn new(config: RuntimeConfig, notifier: Arc<dyn Notifier>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            notifier,
            events,
            poller_handle: None,
            liveness_handle: None,
            shutdown_tx,
            shutdown_rx,
            started: false,
        }
    }

    /// Subscribe to runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    /// Sends the startup notice and starts polling `monitors`.
    pub async fn start(&mut self, monitors: Vec<PageMonitor>) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }

        info!(pages = monitors.len(), "starting runtime");
        deliver(self.notifier.as_ref(), STARTUP_MESSAGE).await;

        let mut poller = PagePoller::new(
            monitors,
            Arc::clone(&self.notifier),
            self.events.clone(),
            self.config.poll_interval,
            self.shutdown_rx.clone(),
        );
        self.poller_handle = Some(tokio::spawn(async move {
            poller.run().await;
            poller.into_monitors()
        }));

        if let Some(at) = self.config.liveness_time {
            let mut alert = LivenessAlert::new(at, Arc::clone(&self.notifier), self.shutdown_rx.clone());
            self.liveness_handle = Some(tokio::spawn(async move { alert.run().await }));
        }

        self.started = true;
        debug!("runtime started");

        Ok(())
    }

    /// Stop the runtime gracefully, returning the monitors.
    ///
    /// A poll cycle in progress finishes before the poller stops.
    pub async fn shutdown(&mut self) -> Result<Vec<PageMonitor>> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        let monitors = match self.poller_handle.take() {
            Some(handle) => {
                debug!("waiting for poller to stop");
                handle
                    .await
                    .map_err(|e| RuntimeError::Shutdown(format!("poller task panicked: {}", e)))?
            }
            None => Vec::new(),
        };

        if let Some(handle) = self.liveness_handle.take() {
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("liveness task panicked: {}", e)))?;
        }

        self.started = false;
        info!("runtime stopped");

        Ok(monitors)
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
