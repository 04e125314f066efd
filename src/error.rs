//! Error types for Correlation Lens
//!
//! The numeric core never fails; these errors belong to the layers around it
//! (loading records, reading configuration, encoding reports).

use thiserror::Error;

/// Errors that can occur while loading data or producing a report
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column length mismatch: {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
