//! Projection error types.

use thiserror::Error;

/// Errors that can occur while assembling a read model.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The listing query failed.
    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
