//! Error types for table readers and writers

use std::path::PathBuf;
use thiserror::Error;

/// Format reader/writer errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input not found or unreadable: {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Result type alias for format operations
pub type Result<T> = std::result::Result<T, Error>;
