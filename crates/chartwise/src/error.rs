//! Error types for the chartwise library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for chartwise operations.
#[derive(Debug, Error)]
pub enum ChartwiseError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The table has no rows or no columns to analyze.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for chartwise operations.
pub type Result<T> = std::result::Result<T, ChartwiseError>;
