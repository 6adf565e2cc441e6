//! Error types for the core crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::page::SnapshotSlot;

/// Errors that can occur in the change-detection core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A page entry is unusable (empty name, empty or malformed url).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A snapshot needed for comparison has never been stored.
    #[error("missing {0} snapshot")]
    MissingSnapshot(SnapshotSlot),

    /// The page list file does not exist.
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A compound duration such as `2h30m` could not be parsed.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A time of day such as `14:00` could not be parsed.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
