//! Telegram notifications for Pagewatch.
//!
//! Provides [`TelegramNotifier`], an implementation of the runtime's
//! [`Notifier`](pagewatch_runtime::Notifier) trait that sends every message to
//! one chat, and [`Credentials`] lookup from the environment or a tokens file.
//!
//! # Example
//!
//! ```no_run
//! use pagewatch_runtime::Notifier;
//! use pagewatch_telegram::{Credentials, TelegramNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens = pagewatch_core::config::telegram_tokens_file();
//!     if let Some(credentials) = Credentials::load(&tokens)? {
//!         let notifier = TelegramNotifier::new(&credentials);
//!         notifier.notify("Program started.").await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod error;
pub mod notifier;

pub use credentials::Credentials;
pub use error::{Result, TelegramError};
pub use notifier::TelegramNotifier;
