//! Shared types for the pickup point service.

pub mod clock;
pub mod model;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{
    City, ParseEnumError, PickupPoint, Product, ProductType, Reception, ReceptionStatus,
};
pub use types::{PickupPointId, ProductId, ReceptionId};
