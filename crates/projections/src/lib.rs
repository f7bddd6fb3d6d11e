//! Read side of the pickup point service.
//!
//! - [`PickupPointTreeView`] runs the listing join and folds it into trees
//! - [`assemble`] is the single-pass row fold
//! - [`PageRequest`] resolves page/limit against [`PageLimits`]

pub mod error;
pub mod page;
pub mod tree;
pub mod view;

pub use error::{ProjectionError, Result};
pub use page::{PageLimits, PageRequest};
pub use tree::{PickupPointTree, ReceptionTree, assemble};
pub use view::{ListPoints, PickupPointTreeView};
