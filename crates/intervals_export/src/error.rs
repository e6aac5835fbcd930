//! Custom error types for the export binary.

use thiserror::Error;

/// Export command errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("API error: {0}")]
    Api(#[from] intervals_client::IntervalsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
