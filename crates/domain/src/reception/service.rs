//! Reception lifecycle manager.

use std::sync::Arc;

use common::{
    Clock, PickupPointId, Product, ProductType, Reception, ReceptionId, ReceptionStatus,
    SystemClock,
};
use storage::{Store, StoreError, StoreTx};

use super::ReceptionError;
use crate::ledger::ProductLedger;
use crate::{DomainError, Result};

/// Opens and closes receptions and scans products into the open one.
///
/// Each operation runs in its own transaction: it reads the pickup point's
/// open reception, acts on it, and commits. Any error rolls the transaction
/// back before it is returned. The store's one-open-reception constraint is
/// the authority; the read beforehand only turns the common case into a
/// typed error without hitting the constraint.
pub struct ReceptionService<S: Store> {
    store: S,
    ledger: ProductLedger,
    clock: Arc<dyn Clock>,
}

impl<S: Store> ReceptionService<S> {
    /// Creates a new reception service using the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a new reception service with an explicit clock.
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ledger: ProductLedger::new(clock.clone()),
            clock,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Opens a new reception at a pickup point.
    #[tracing::instrument(skip(self))]
    pub async fn open_reception(&self, pickup_point_id: PickupPointId) -> Result<Reception> {
        let mut tx = self.store.begin().await?;
        let outcome = self.open_in(&mut tx, pickup_point_id).await;
        let reception = finish(tx, outcome).await?;

        metrics::counter!("receptions_created_total").increment(1);
        tracing::info!(reception_id = %reception.id, "reception opened");
        Ok(reception)
    }

    /// Scans a product into the pickup point's open reception.
    #[tracing::instrument(skip(self))]
    pub async fn scan_product(
        &self,
        product_type: ProductType,
        pickup_point_id: PickupPointId,
    ) -> Result<Product> {
        let mut tx = self.store.begin().await?;
        let outcome = self.scan_in(&mut tx, product_type, pickup_point_id).await;
        let product = finish(tx, outcome).await?;

        metrics::counter!("products_added_total").increment(1);
        Ok(product)
    }

    /// Removes the most recently scanned product of the open reception.
    #[tracing::instrument(skip(self))]
    pub async fn remove_last_product(&self, pickup_point_id: PickupPointId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let outcome = self.remove_last_in(&mut tx, pickup_point_id).await;
        finish(tx, outcome).await?;

        metrics::counter!("products_deleted_total").increment(1);
        Ok(())
    }

    /// Closes the pickup point's open reception.
    ///
    /// A point with no open reception, whether its last one was closed or it
    /// never had one, yields `ReceptionAlreadyClosed`.
    #[tracing::instrument(skip(self))]
    pub async fn close_reception(&self, pickup_point_id: PickupPointId) -> Result<Reception> {
        let mut tx = self.store.begin().await?;
        let outcome = self.close_in(&mut tx, pickup_point_id).await;
        let reception = finish(tx, outcome).await?;

        metrics::counter!("receptions_closed_total").increment(1);
        tracing::info!(reception_id = %reception.id, "reception closed");
        Ok(reception)
    }

    async fn open_in(&self, tx: &mut S::Tx, pickup_point_id: PickupPointId) -> Result<Reception> {
        if tx.open_reception_id(pickup_point_id).await?.is_some() {
            return Err(ReceptionError::ReceptionAlreadyOpen(pickup_point_id).into());
        }

        let reception = Reception {
            id: ReceptionId::new(),
            date_time: self.clock.now(),
            pvz_id: pickup_point_id,
            status: ReceptionStatus::InProgress,
        };

        tx.insert_reception(&reception)
            .await
            .map_err(|e| -> DomainError {
                match e {
                    // Lost the race to a concurrent open.
                    StoreError::OpenReceptionExists { pickup_point_id } => {
                        ReceptionError::ReceptionAlreadyOpen(pickup_point_id).into()
                    }
                    StoreError::PickupPointNotFound(id) => {
                        ReceptionError::PickupPointNotFound(id).into()
                    }
                    other => other.into(),
                }
            })?;

        Ok(reception)
    }

    async fn scan_in(
        &self,
        tx: &mut S::Tx,
        product_type: ProductType,
        pickup_point_id: PickupPointId,
    ) -> Result<Product> {
        let reception_id = tx
            .open_reception_id(pickup_point_id)
            .await?
            .ok_or(ReceptionError::NoOpenReception(pickup_point_id))?;

        self.ledger.append(tx, product_type, reception_id).await
    }

    async fn remove_last_in(&self, tx: &mut S::Tx, pickup_point_id: PickupPointId) -> Result<()> {
        let reception_id = tx
            .open_reception_id(pickup_point_id)
            .await?
            .ok_or(ReceptionError::NoOpenReception(pickup_point_id))?;

        self.ledger.remove_most_recent(tx, reception_id).await?;
        Ok(())
    }

    async fn close_in(&self, tx: &mut S::Tx, pickup_point_id: PickupPointId) -> Result<Reception> {
        let reception_id = tx
            .open_reception_id(pickup_point_id)
            .await?
            .ok_or(ReceptionError::ReceptionAlreadyClosed(pickup_point_id))?;

        tx.close_reception(reception_id)
            .await
            .map_err(|e| -> DomainError {
                match e {
                    StoreError::ReceptionNotOpen(_) => {
                        ReceptionError::ReceptionAlreadyClosed(pickup_point_id).into()
                    }
                    other => other.into(),
                }
            })
    }
}

/// Commits on success and rolls back on error, then hands the outcome back.
async fn finish<T: StoreTx, R>(tx: T, outcome: Result<R>) -> Result<R> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            match &err {
                DomainError::Reception(rule) => tracing::info!(reason = %rule, "rejected"),
                other => tracing::warn!(error = %other, "transaction aborted"),
            }
            Err(err)
        }
    }
}
