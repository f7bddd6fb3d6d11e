//! Pickup point registration and listing.

use std::sync::Arc;

use common::{City, Clock, PickupPoint, PickupPointId, SystemClock};
use projections::{ListPoints, PageLimits, PickupPointTree, PickupPointTreeView};
use storage::Store;

use crate::Result;

/// Registers pickup points and serves the paginated tree listing.
pub struct PickupPointRegistry<S: Store> {
    store: S,
    view: PickupPointTreeView<S>,
    clock: Arc<dyn Clock>,
}

impl<S: Store + Clone> PickupPointRegistry<S> {
    pub fn new(store: S) -> Self {
        Self::with_settings(store, PageLimits::default(), Arc::new(SystemClock))
    }

    /// Creates a registry with explicit page limits and clock.
    pub fn with_settings(store: S, limits: PageLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            view: PickupPointTreeView::with_limits(store.clone(), limits),
            store,
            clock,
        }
    }

    /// Registers a new pickup point in one of the supported cities.
    #[tracing::instrument(skip(self))]
    pub async fn create_point(&self, city: City) -> Result<PickupPoint> {
        let point = PickupPoint {
            id: PickupPointId::new(),
            registration_date: self.clock.now(),
            city,
        };

        self.store.insert_pickup_point(&point).await?;

        metrics::counter!("pvz_created_total").increment(1);
        tracing::info!(pvz_id = %point.id, city = city.as_str(), "pickup point registered");
        Ok(point)
    }

    /// Lists pickup points with their receptions and products.
    pub async fn list_points(&self, request: &ListPoints) -> Result<Vec<PickupPointTree>> {
        Ok(self.view.list(request).await?)
    }
}
