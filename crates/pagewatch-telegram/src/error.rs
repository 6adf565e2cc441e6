//! Error types for the Telegram notifier.

use thiserror::Error;

/// Errors that can occur while setting up Telegram delivery.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token present but no chat to send to.
    #[error("TELEGRAM_BOT_TOKEN is set but TELEGRAM_CHAT_ID is not")]
    NoChatId,

    /// Chat id is not an integer.
    #[error("invalid Telegram chat id: {0}")]
    InvalidChatId(String),

    /// Bot token is empty.
    #[error("Telegram bot token is empty")]
    EmptyToken,

    /// Telegram API request failed.
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<teloxide::RequestError> for TelegramError {
    fn from(e: teloxide::RequestError) -> Self {
        TelegramError::Request(e.to_string())
    }
}
