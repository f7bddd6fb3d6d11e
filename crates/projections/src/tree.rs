//! Nested pickup point → reception → product read model.

use std::collections::HashMap;

use common::{PickupPoint, PickupPointId, Product, Reception, ReceptionId};
use serde::Serialize;
use storage::PointRow;

/// A pickup point with its receptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickupPointTree {
    pub pvz: PickupPoint,
    pub receptions: Vec<ReceptionTree>,
}

/// A reception with its products in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceptionTree {
    pub reception: Reception,
    pub products: Vec<Product>,
}

struct PointSlot {
    index: usize,
    receptions: HashMap<ReceptionId, usize>,
}

/// Folds join rows into trees in a single pass.
///
/// Pickup points, receptions and products appear in the order they are first
/// seen, so the join's ORDER BY carries through. A row without a reception
/// only registers its pickup point; a row without a product only registers
/// its reception.
pub fn assemble<I>(rows: I) -> Vec<PickupPointTree>
where
    I: IntoIterator<Item = PointRow>,
{
    let mut trees: Vec<PickupPointTree> = Vec::new();
    let mut slots: HashMap<PickupPointId, PointSlot> = HashMap::new();

    for row in rows {
        let PointRow {
            pickup_point,
            reception,
            product,
        } = row;

        let slot = slots.entry(pickup_point.id).or_insert_with(|| {
            trees.push(PickupPointTree {
                pvz: pickup_point,
                receptions: Vec::new(),
            });
            PointSlot {
                index: trees.len() - 1,
                receptions: HashMap::new(),
            }
        });
        let tree = &mut trees[slot.index];

        let Some(reception) = reception else {
            continue;
        };

        let reception_index = *slot.receptions.entry(reception.id).or_insert_with(|| {
            tree.receptions.push(ReceptionTree {
                reception,
                products: Vec::new(),
            });
            tree.receptions.len() - 1
        });

        if let Some(product) = product {
            tree.receptions[reception_index].products.push(product);
        }
    }

    trees
}
