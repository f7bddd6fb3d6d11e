//! Domain error types.

use projections::ProjectionError;
use storage::StoreError;
use thiserror::Error;

use crate::reception::ReceptionError;

/// Errors that can occur during domain operations.
///
/// `Reception` carries the typed business-rule outcomes; `Store` and
/// `Projection` are opaque infrastructure failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A reception rule rejected the operation.
    #[error("{0}")]
    Reception(#[from] ReceptionError),

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The listing read model failed.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
}

impl DomainError {
    /// Returns the business-rule outcome, if this is one.
    pub fn as_reception(&self) -> Option<&ReceptionError> {
        match self {
            DomainError::Reception(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
