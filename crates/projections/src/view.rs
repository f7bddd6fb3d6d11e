//! Pickup point listing backed by the store's join query.

use chrono::{DateTime, Utc};
use storage::{PointQuery, Store};

use crate::Result;
use crate::page::{PageLimits, PageRequest};
use crate::tree::{PickupPointTree, assemble};

/// Listing parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPoints {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Read model view over pickup points, their receptions and products.
///
/// Pages count distinct pickup points; a point's receptions and products are
/// never split across pages.
#[derive(Clone)]
pub struct PickupPointTreeView<S: Store> {
    store: S,
    limits: PageLimits,
}

impl<S: Store> PickupPointTreeView<S> {
    /// Creates a view with the default page limits.
    pub fn new(store: S) -> Self {
        Self::with_limits(store, PageLimits::default())
    }

    pub fn with_limits(store: S, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    /// Runs the listing join and folds it into trees.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, request: &ListPoints) -> Result<Vec<PickupPointTree>> {
        let page = PageRequest::resolve(request.page, request.limit, &self.limits);

        let mut query = PointQuery::new(u64::from(page.limit())).offset(page.offset());
        if let Some(start) = request.start_date {
            query = query.start_date(start);
        }
        if let Some(end) = request.end_date {
            query = query.end_date(end);
        }

        let rows = self.store.fetch_point_rows(&query).await?;
        let row_count = rows.len();
        let trees = assemble(rows);

        tracing::debug!(
            rows = row_count,
            points = trees.len(),
            page = page.page(),
            limit = page.limit(),
            "pickup point listing assembled"
        );

        Ok(trees)
    }
}
