//! Bot token and chat id lookup.
//!
//! Credentials come from the environment first:
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//!
//! and otherwise from a `telegram_tokens.json` file:
//!
//! ```json
//! { "chat_id": 123456789, "bot_token": "123:abc" }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TelegramError};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the chat id.
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Where notifications are sent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bot_token: String,
    pub chat_id: i64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIdField {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
struct TokensFile {
    chat_id: ChatIdField,
    bot_token: String,
}

fn parse_chat_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| TelegramError::InvalidChatId(raw.to_string()))
}

impl Credentials {
    /// Builds credentials from raw values.
    ///
    /// Returns `Ok(None)` when no token is given.
    pub fn from_values(token: Option<String>, chat_id: Option<String>) -> Result<Option<Self>> {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let chat_id = chat_id.ok_or(TelegramError::NoChatId)?;
        Ok(Some(Self {
            bot_token: token.trim().to_string(),
            chat_id: parse_chat_id(&chat_id)?,
        }))
    }

    /// Reads credentials from the environment.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_values(std::env::var(TOKEN_ENV).ok(), std::env::var(CHAT_ID_ENV).ok())
    }

    /// Reads credentials from a tokens file; `Ok(None)` if it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let file: TokensFile = serde_json::from_str(&content)?;

        if file.bot_token.trim().is_empty() {
            return Err(TelegramError::EmptyToken);
        }
        let chat_id = match file.chat_id {
            ChatIdField::Number(id) => id,
            ChatIdField::Text(raw) => parse_chat_id(&raw)?,
        };

        debug!(path = %path.display(), "loaded Telegram credentials from file");
        Ok(Some(Self {
            bot_token: file.bot_token.trim().to_string(),
            chat_id,
        }))
    }

    /// Reads credentials from the environment, falling back to `tokens_file`.
    pub fn load(tokens_file: &Path) -> Result<Option<Self>> {
        match Self::from_env()? {
            Some(credentials) => Ok(Some(credentials)),
            None => Self::from_file(tokens_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_values() {
        let creds = Credentials::from_values(Some("123:abc".into()), Some(" -10042 ".into()))
            .unwrap()
            .unwrap();
        assert_eq!(creds.bot_token, "123:abc");
        assert_eq!(creds.chat_id, -100_42);
    }

    #[test]
    fn test_missing_token_is_none() {
        assert!(Credentials::from_values(None, Some("1".into())).unwrap().is_none());
        assert!(Credentials::from_values(Some("  ".into()), None).unwrap().is_none());
    }

    #[test]
    fn test_token_without_chat_is_error() {
        let result = Credentials::from_values(Some("123:abc".into()), None);
        assert!(matches!(result, Err(TelegramError::NoChatId)));

        let result = Credentials::from_values(Some("123:abc".into()), Some("me".into()));
        assert!(matches!(result, Err(TelegramError::InvalidChatId(_))));
    }

    #[test]
    fn test_from_file_numeric_and_string_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("telegram_tokens.json");

        fs::write(&path, r#"{"chat_id": 987, "bot_token": "t1"}"#).unwrap();
        let creds = Credentials::from_file(&path).unwrap().unwrap();
        assert_eq!(creds.chat_id, 987);
        assert_eq!(creds.bot_token, "t1");

        fs::write(&path, r#"{"chat_id": "654", "bot_token": "t2"}"#).unwrap();
        let creds = Credentials::from_file(&path).unwrap().unwrap();
        assert_eq!(creds.chat_id, 654);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempdir().unwrap();
        let result = Credentials::from_file(&dir.path().join("none.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_from_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("telegram_tokens.json");
        fs::write(&path, r#"{"chat_id": 1}"#).unwrap();

        assert!(matches!(
            Credentials::from_file(&path),
            Err(TelegramError::JsonError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials {
            bot_token: "secret".into(),
            chat_id: 1,
        };
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
