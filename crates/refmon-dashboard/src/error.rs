//! Dashboard error types.

use thiserror::Error;

/// Dashboard errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Surface write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("View serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No views configured")]
    NoViews,
}

pub type DashboardResult<T> = Result<T, DashboardError>;
