//! Error types for refmon-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Snapshot decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Snapshot encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
