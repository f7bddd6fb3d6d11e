use chrono::{DateTime, Utc};
use common::{PickupPoint, Product, Reception};

/// Filter and window for the pickup point listing join.
///
/// The date range applies to reception open timestamps (both bounds
/// inclusive). With a range set, only pickup points that have at least one
/// reception inside it are returned. `offset`/`limit` count distinct pickup
/// points, not joined rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointQuery {
    /// Receptions opened at or after this instant.
    pub start_date: Option<DateTime<Utc>>,

    /// Receptions opened at or before this instant.
    pub end_date: Option<DateTime<Utc>>,

    /// Number of pickup points to skip.
    pub offset: u64,

    /// Maximum number of pickup points to return.
    pub limit: u64,
}

impl PointQuery {
    /// Creates an unfiltered query over the first `limit` pickup points.
    pub fn new(limit: u64) -> Self {
        Self {
            start_date: None,
            end_date: None,
            offset: 0,
            limit,
        }
    }

    /// Filters receptions opened at or after this instant.
    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Filters receptions opened at or before this instant.
    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Skips this many pickup points.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if a date bound is set.
    pub fn has_date_filter(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Returns true if the reception open time falls inside the range.
    pub fn matches(&self, opened_at: DateTime<Utc>) -> bool {
        self.start_date.is_none_or(|start| opened_at >= start)
            && self.end_date.is_none_or(|end| opened_at <= end)
    }
}

/// One row of the pickup point ⋈ reception ⋈ product join.
///
/// `reception` is `None` for a pickup point with no (matching) receptions;
/// `product` is `None` for a reception with no products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointRow {
    pub pickup_point: PickupPoint,
    pub reception: Option<Reception>,
    pub product: Option<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn unfiltered_query_matches_everything() {
        let query = PointQuery::new(10);
        assert!(!query.has_date_filter());
        assert!(query.matches(at(0)));
        assert!(query.matches(at(23)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let query = PointQuery::new(10).start_date(at(10)).end_date(at(12));
        assert!(query.has_date_filter());
        assert!(query.matches(at(10)));
        assert!(query.matches(at(12)));
        assert!(!query.matches(at(10) - Duration::seconds(1)));
        assert!(!query.matches(at(12) + Duration::seconds(1)));
    }

    #[test]
    fn builder_chain() {
        let query = PointQuery::new(5).offset(15).start_date(at(1));
        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 15);
        assert_eq!(query.start_date, Some(at(1)));
        assert!(query.end_date.is_none());
    }
}
