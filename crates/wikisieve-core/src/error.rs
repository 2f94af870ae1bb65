//! Error types shared across the wikisieve crates.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the core pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON decoding error for a raw stream record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
