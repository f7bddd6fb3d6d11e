//! Domain layer for pickup point receptions.
//!
//! This crate provides:
//! - `ReceptionService`, the reception lifecycle state machine
//! - `ProductLedger`, the ordered product list of a reception
//! - `PickupPointRegistry`, point registration and the tree listing

pub mod error;
pub mod ledger;
pub mod reception;
pub mod registry;

pub use error::{DomainError, Result};
pub use ledger::ProductLedger;
pub use reception::{ReceptionError, ReceptionService};
pub use registry::PickupPointRegistry;
