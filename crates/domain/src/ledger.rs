//! Append / remove-last operations on a reception's product list.

use std::sync::Arc;

use common::{Clock, Product, ProductId, ProductType, ReceptionId};
use storage::{StoreError, StoreTx};

use crate::{DomainError, Result};
use crate::reception::ReceptionError;

/// Product list of a reception, mutated only inside a caller's transaction.
///
/// Products are ordered by scan timestamp; products sharing a timestamp keep
/// their insertion order, so "most recent" is always a single product.
#[derive(Clone)]
pub struct ProductLedger {
    clock: Arc<dyn Clock>,
}

impl ProductLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Appends a product stamped with the current time.
    pub async fn append<T: StoreTx>(
        &self,
        tx: &mut T,
        product_type: ProductType,
        reception_id: ReceptionId,
    ) -> Result<Product> {
        let product = Product {
            id: ProductId::new(),
            date_time: self.clock.now(),
            product_type,
            reception_id,
        };

        tx.insert_product(&product).await?;
        tracing::debug!(product_id = %product.id, %reception_id, "product appended");

        Ok(product)
    }

    /// Removes the most recently scanned product.
    pub async fn remove_most_recent<T: StoreTx>(
        &self,
        tx: &mut T,
        reception_id: ReceptionId,
    ) -> Result<ProductId> {
        let product_id = tx
            .delete_last_product(reception_id)
            .await
            .map_err(|e| -> DomainError {
                match e {
                    StoreError::ProductNotFound { reception_id } => {
                        ReceptionError::NoProductsInReception(reception_id).into()
                    }
                    other => other.into(),
                }
            })?;

        tracing::debug!(%product_id, %reception_id, "product removed");
        Ok(product_id)
    }
}
