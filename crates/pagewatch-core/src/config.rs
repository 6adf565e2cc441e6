//! Shared configuration paths for Pagewatch.
//!
//! # Storage Structure
//!
//! Application data lives under `~/.pagewatch/`:
//!
//! ```text
//! ~/.pagewatch/
//! ├── config/       # .env.local, telegram_tokens.json
//! └── snapshots/    # Previous/current snapshot per page
//! ```
//!
//! # Environment Variables
//!
//! - `PAGEWATCH_STATE_DIR`: Override the base state directory
//! - `PAGEWATCH_CONFIG_DIR`: Override the config directory

use std::path::{Path, PathBuf};

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "PAGEWATCH_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "PAGEWATCH_CONFIG_DIR";

/// Default page list file, relative to the working directory.
pub const DEFAULT_PAGES_FILE: &str = "config.csv";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".pagewatch";

const CONFIG_SUBDIR: &str = "config";
const SNAPSHOTS_SUBDIR: &str = "snapshots";

/// Get the Pagewatch state directory.
///
/// The state directory is determined by:
/// 1. `PAGEWATCH_STATE_DIR` environment variable if set
/// 2. `~/.pagewatch` if home directory is available
/// 3. `.pagewatch` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the user config directory.
///
/// Defaults to `~/.pagewatch/config/` or `PAGEWATCH_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the directory holding snapshot files under `state_dir`.
pub fn snapshots_dir_in(state_dir: &Path) -> PathBuf {
    state_dir.join(SNAPSHOTS_SUBDIR)
}

/// Get the .env.local file path.
///
/// Environment file for secrets (bot token, chat id).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Get the Telegram credentials file path.
pub fn telegram_tokens_file() -> PathBuf {
    config_dir().join("telegram_tokens.json")
}

/// Ensure `state_dir` and its subdirectories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs(state_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(state_dir.join(CONFIG_SUBDIR))?;
    std::fs::create_dir_all(snapshots_dir_in(state_dir))?;
    Ok(())
}
