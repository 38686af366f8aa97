//! Common error types for SPF

use thiserror::Error;

/// Common result type for SPF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SPF crates
///
/// Record-level parse problems never surface here; they degrade to absent
/// values inside the extractor and rating evaluator.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Remote table request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input contained no data at all
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
