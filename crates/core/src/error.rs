//! Error types for the deduplication engine

use thiserror::Error;

/// Core deduplication errors
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Missing required field `{column}`{}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    MissingField { column: String, line: Option<usize> },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
