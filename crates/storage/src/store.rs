use async_trait::async_trait;
use common::{PickupPoint, PickupPointId, Product, ProductId, Reception, ReceptionId};

use crate::{PointQuery, PointRow, Result};

/// Persistent storage for pickup points, receptions and products.
///
/// Writes that must observe and change reception state together go through
/// a [`StoreTx`] obtained from [`Store::begin`]. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait Store: Send + Sync {
    /// The transaction handle type.
    type Tx: StoreTx;

    /// Starts a transaction.
    async fn begin(&self) -> Result<Self::Tx>;

    /// Persists a new pickup point.
    async fn insert_pickup_point(&self, point: &PickupPoint) -> Result<()>;

    /// Runs the listing join.
    ///
    /// Rows are ordered by pickup point id, reception open time, then
    /// product scan order.
    async fn fetch_point_rows(&self, query: &PointQuery) -> Result<Vec<PointRow>>;
}

/// A single storage transaction.
///
/// Dropping the handle without calling [`commit`](StoreTx::commit) discards
/// every change made through it.
#[async_trait]
pub trait StoreTx: Send {
    /// Returns the id of the pickup point's reception in progress, if any.
    ///
    /// Implementations lock that reception until the transaction ends.
    async fn open_reception_id(
        &mut self,
        pickup_point_id: PickupPointId,
    ) -> Result<Option<ReceptionId>>;

    /// Inserts a reception.
    ///
    /// Fails with `OpenReceptionExists` if the point already has one in
    /// progress and with `PickupPointNotFound` for an unknown point.
    async fn insert_reception(&mut self, reception: &Reception) -> Result<()>;

    /// Moves an in-progress reception to `Closed` and returns the stored record.
    ///
    /// Fails with `ReceptionNotOpen` if it is not in progress.
    async fn close_reception(&mut self, reception_id: ReceptionId) -> Result<Reception>;

    /// Appends a product to a reception.
    async fn insert_product(&mut self, product: &Product) -> Result<()>;

    /// Deletes the most recently scanned product of a reception and returns its id.
    ///
    /// Fails with `ProductNotFound` if the reception has no products.
    async fn delete_last_product(&mut self, reception_id: ReceptionId) -> Result<ProductId>;

    /// Makes the transaction's changes durable.
    async fn commit(self) -> Result<()>;

    /// Discards the transaction's changes.
    async fn rollback(self) -> Result<()>;
}
