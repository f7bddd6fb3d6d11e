use std::sync::Arc;

use async_trait::async_trait;
use common::{
    PickupPoint, PickupPointId, Product, ProductId, Reception, ReceptionId, ReceptionStatus,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    PointQuery, PointRow, Result, StoreError,
    store::{Store, StoreTx},
};

#[derive(Debug, Default)]
struct Tables {
    pickup_points: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    // Insertion order doubles as the scan sequence.
    products: Vec<Product>,
}

/// In-memory store implementation for testing and database-less runs.
///
/// Transactions hold an exclusive lock on the whole store from `begin` until
/// commit, rollback or drop, so they are fully serialized. Writes go straight
/// to the tables and are undone if the transaction does not commit. Constraints of the
/// PostgreSQL schema (foreign keys, one open reception per point) are checked
/// on write.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products across all receptions.
    pub async fn product_count(&self) -> usize {
        self.tables.lock().await.products.len()
    }

    /// Returns the receptions of a pickup point in insertion order.
    pub async fn receptions_for(&self, pickup_point_id: PickupPointId) -> Vec<Reception> {
        self.tables
            .lock()
            .await
            .receptions
            .iter()
            .filter(|r| r.pvz_id == pickup_point_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<InMemoryTx> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(InMemoryTx {
            guard,
            undo: Vec::new(),
        })
    }

    async fn insert_pickup_point(&self, point: &PickupPoint) -> Result<()> {
        self.tables.lock().await.pickup_points.push(point.clone());
        Ok(())
    }

    async fn fetch_point_rows(&self, query: &PointQuery) -> Result<Vec<PointRow>> {
        let tables = self.tables.lock().await;

        let mut points: Vec<&PickupPoint> = tables
            .pickup_points
            .iter()
            .filter(|p| {
                !query.has_date_filter()
                    || tables
                        .receptions
                        .iter()
                        .any(|r| r.pvz_id == p.id && query.matches(r.date_time))
            })
            .collect();
        points.sort_by_key(|p| p.id);

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        let mut rows = Vec::new();
        for point in points.into_iter().skip(offset).take(limit) {
            let mut receptions: Vec<&Reception> = tables
                .receptions
                .iter()
                .filter(|r| r.pvz_id == point.id && query.matches(r.date_time))
                .collect();
            receptions.sort_by_key(|r| (r.date_time, r.id));

            if receptions.is_empty() {
                rows.push(PointRow {
                    pickup_point: point.clone(),
                    reception: None,
                    product: None,
                });
                continue;
            }

            for reception in receptions {
                let mut products: Vec<(usize, &Product)> = tables
                    .products
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.reception_id == reception.id)
                    .collect();
                products.sort_by_key(|(seq, p)| (p.date_time, *seq));

                if products.is_empty() {
                    rows.push(PointRow {
                        pickup_point: point.clone(),
                        reception: Some(reception.clone()),
                        product: None,
                    });
                }
                for (_, product) in products {
                    rows.push(PointRow {
                        pickup_point: point.clone(),
                        reception: Some(reception.clone()),
                        product: Some(product.clone()),
                    });
                }
            }
        }

        Ok(rows)
    }
}

/// Inverse of one write, replayed newest-first on rollback.
#[derive(Debug)]
enum Undo {
    ReceptionInserted,
    ReceptionClosed(ReceptionId),
    ProductInserted,
    ProductDeleted { index: usize, product: Product },
}

/// An in-memory transaction writing through to the locked tables.
///
/// Every write records its inverse; unless the transaction is committed the
/// inverses are applied on rollback or drop.
pub struct InMemoryTx {
    guard: OwnedMutexGuard<Tables>,
    undo: Vec<Undo>,
}

impl InMemoryTx {
    fn revert(&mut self) {
        while let Some(undo) = self.undo.pop() {
            let tables = &mut *self.guard;
            match undo {
                Undo::ReceptionInserted => {
                    tables.receptions.pop();
                }
                Undo::ReceptionClosed(id) => {
                    if let Some(r) = tables.receptions.iter_mut().find(|r| r.id == id) {
                        r.status = ReceptionStatus::InProgress;
                    }
                }
                Undo::ProductInserted => {
                    tables.products.pop();
                }
                Undo::ProductDeleted { index, product } => {
                    tables.products.insert(index, product);
                }
            }
        }
    }
}

impl Drop for InMemoryTx {
    fn drop(&mut self) {
        if !self.undo.is_empty() {
            tracing::debug!(writes = self.undo.len(), "in-memory transaction rolled back");
            self.revert();
        }
    }
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn open_reception_id(
        &mut self,
        pickup_point_id: PickupPointId,
    ) -> Result<Option<ReceptionId>> {
        Ok(self
            .guard
            .receptions
            .iter()
            .find(|r| r.pvz_id == pickup_point_id && r.status.can_modify_products())
            .map(|r| r.id))
    }

    async fn insert_reception(&mut self, reception: &Reception) -> Result<()> {
        if !self
            .guard
            .pickup_points
            .iter()
            .any(|p| p.id == reception.pvz_id)
        {
            return Err(StoreError::PickupPointNotFound(reception.pvz_id));
        }

        // Partial unique index simulation
        if !reception.status.is_terminal()
            && self
                .guard
                .receptions
                .iter()
                .any(|r| r.pvz_id == reception.pvz_id && !r.status.is_terminal())
        {
            return Err(StoreError::OpenReceptionExists {
                pickup_point_id: reception.pvz_id,
            });
        }

        self.guard.receptions.push(reception.clone());
        self.undo.push(Undo::ReceptionInserted);
        Ok(())
    }

    async fn close_reception(&mut self, reception_id: ReceptionId) -> Result<Reception> {
        let reception = self
            .guard
            .receptions
            .iter_mut()
            .find(|r| r.id == reception_id && r.status.can_close())
            .ok_or(StoreError::ReceptionNotOpen(reception_id))?;

        reception.status = ReceptionStatus::Closed;
        let closed = reception.clone();
        self.undo.push(Undo::ReceptionClosed(reception_id));
        Ok(closed)
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        if !self
            .guard
            .receptions
            .iter()
            .any(|r| r.id == product.reception_id)
        {
            return Err(StoreError::ReceptionNotOpen(product.reception_id));
        }

        self.guard.products.push(product.clone());
        self.undo.push(Undo::ProductInserted);
        Ok(())
    }

    async fn delete_last_product(&mut self, reception_id: ReceptionId) -> Result<ProductId> {
        let index = self
            .guard
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.reception_id == reception_id)
            .max_by_key(|(seq, p)| (p.date_time, *seq))
            .map(|(seq, _)| seq)
            .ok_or(StoreError::ProductNotFound { reception_id })?;

        let product = self.guard.products.remove(index);
        let id = product.id;
        self.undo.push(Undo::ProductDeleted { index, product });
        Ok(id)
    }

    async fn commit(mut self) -> Result<()> {
        self.undo.clear();
        Ok(())
    }

    async fn rollback(mut self) -> Result<()> {
        self.revert();
        Ok(())
    }
}
