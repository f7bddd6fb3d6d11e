use common::{ParseEnumError, PickupPointId, ReceptionId};
use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pickup point already has a reception in progress.
    /// Raised by the one-open-reception-per-point constraint.
    #[error("Pickup point {pickup_point_id} already has a reception in progress")]
    OpenReceptionExists { pickup_point_id: PickupPointId },

    /// The referenced pickup point does not exist.
    #[error("Pickup point not found: {0}")]
    PickupPointNotFound(PickupPointId),

    /// The reception is not (or no longer) in progress.
    #[error("Reception {0} is not in progress")]
    ReceptionNotOpen(ReceptionId),

    /// The reception holds no products.
    #[error("No products in reception {reception_id}")]
    ProductNotFound { reception_id: ReceptionId },

    /// A stored value could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] ParseEnumError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
