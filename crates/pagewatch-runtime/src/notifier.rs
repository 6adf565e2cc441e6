//! Notification delivery.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::NotifyError;

/// Longest message a notifier is handed, in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Sent once when the polling loop launches.
pub const STARTUP_MESSAGE: &str = "Program started.";

/// Sent daily at the configured liveness time.
pub const LIVENESS_MESSAGE: &str = "#UptimeStatus, the program is working";

/// Destination for user-facing messages.
///
/// Implementations must accept concurrent calls; each message is
/// self-contained.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message`.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!(target: "pagewatch::notify", "{}", message);
        Ok(())
    }
}

/// Sends `message`, logging and discarding any failure.
pub async fn deliver(notifier: &dyn Notifier, message: &str) {
    if let Err(e) = notifier.notify(message).await {
        warn!(error = %e, "notification failed");
    }
}

/// Builds the message announcing a change on `page`.
pub fn change_message(page: &str, detail: &str) -> String {
    truncate_message(
        &format!(
            "A change on {} has been detected.\n\nHere is the change:\n{}",
            page, detail
        ),
        MESSAGE_LIMIT,
    )
}

/// Cuts `message` to at most `limit` characters, marking the cut with `…`.
pub fn truncate_message(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        return message.to_string();
    }
    if limit == 0 {
        return String::new();
    }
    let mut truncated: String = message.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}
