//! Error types for the pagewatch binary.

use thiserror::Error;

/// Errors that stop the program.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pagewatch_core::CoreError),

    #[error(transparent)]
    Persistence(#[from] pagewatch_persistence::PersistenceError),

    #[error(transparent)]
    Runtime(#[from] pagewatch_runtime::RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the binary.
pub type Result<T> = std::result::Result<T, CliError>;
