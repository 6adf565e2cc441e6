//! Telegram implementation of the runtime's notifier.

use async_trait::async_trait;
use pagewatch_runtime::notifier::{truncate_message, MESSAGE_LIMIT};
use pagewatch_runtime::{Notifier, NotifyError};
use teloxide::prelude::*;
use tracing::{debug, info};
use url::Url;

use crate::credentials::Credentials;
use crate::error::Result;

/// Sends notifications to a single Telegram chat.
///
/// Messages go out as plain text; diff output is full of characters that a
/// Markdown parse mode would reject.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Creates a notifier for the chat in `credentials`.
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            bot: Bot::new(credentials.bot_token.clone()),
            chat_id: ChatId(credentials.chat_id),
        }
    }

    /// Points the bot at another Bot API server.
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> std::result::Result<(), NotifyError> {
        let text = truncate_message(message, MESSAGE_LIMIT);
        debug!(chat_id = self.chat_id.0, chars = text.chars().count(), "sending Telegram message");

        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        info!(chat_id = self.chat_id.0, "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            bot_token: "123:abc".into(),
            chat_id: 42,
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_reports_send_error() {
        let notifier = TelegramNotifier::new(&credentials())
            .with_api_url(Url::parse("http://127.0.0.1:9/").unwrap());

        let result = notifier.notify("A change on news has been detected.").await;
        assert!(matches!(result, Err(NotifyError::Send(_))));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let notifier = TelegramNotifier::new(&credentials())
            .with_api_url(Url::parse("http://127.0.0.1:9/").unwrap());

        pagewatch_runtime::deliver(&notifier, "Program started.").await;
    }
}
