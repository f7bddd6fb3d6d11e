//! HTTP handlers and the state they share.

pub mod health;
pub mod metrics;
pub mod pvz;
pub mod receptions;

use common::PickupPointId;
use domain::{PickupPointRegistry, ReceptionService};
use storage::Store;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub registry: PickupPointRegistry<S>,
    pub receptions: ReceptionService<S>,
}

fn parse_pvz_id(raw: &str) -> Result<PickupPointId, ApiError> {
    match uuid::Uuid::parse_str(raw) {
        Ok(uuid) if !uuid.is_nil() => Ok(PickupPointId::from_uuid(uuid)),
        _ => Err(ApiError::BadRequest("invalid pvz id".to_string())),
    }
}
