//! Reception lifecycle and its rule violations.

mod service;

pub use service::ReceptionService;

use common::{PickupPointId, ReceptionId};
use thiserror::Error;

/// Business-rule outcomes of reception operations.
///
/// Every one of these leaves storage untouched: the surrounding transaction
/// is rolled back before the error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceptionError {
    /// The pickup point already has a reception in progress.
    #[error("Reception is already open at pickup point {0}")]
    ReceptionAlreadyOpen(PickupPointId),

    /// Products can only be scanned or removed while a reception is open.
    #[error("No reception in progress at pickup point {0}")]
    NoOpenReception(PickupPointId),

    /// Nothing to close. Also returned when no reception was ever opened.
    #[error("Reception is already closed at pickup point {0}")]
    ReceptionAlreadyClosed(PickupPointId),

    /// The open reception has no products to remove.
    #[error("No products in reception {0}")]
    NoProductsInReception(ReceptionId),

    /// The pickup point does not exist.
    #[error("Pickup point not found: {0}")]
    PickupPointNotFound(PickupPointId),
}
