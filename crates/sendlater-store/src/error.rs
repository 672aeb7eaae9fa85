//! Error types for the queue store.

use thiserror::Error;

/// Errors that can occur reading or writing the durable queue document.
///
/// A missing store file is not an error: `load` substitutes an empty
/// queue and logs a warning instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
