//! Page window for the pickup point listing.

/// Default and maximum page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Used when no limit is given or the given one is out of range.
    pub default_limit: u32,

    /// Largest accepted limit.
    pub max_limit: u32,
}

impl PageLimits {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 30;

    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::MAX_LIMIT)
    }
}

/// A resolved, 1-based page of pickup points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Resolves a requested page and limit against the configured limits.
    ///
    /// Missing or zero pages become page 1. A missing limit, zero, or one
    /// above `max_limit` falls back to `default_limit` (it is not capped at
    /// the maximum).
    pub fn resolve(page: Option<u32>, limit: Option<u32>, limits: &PageLimits) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = match limit {
            Some(l) if (1..=limits.max_limit).contains(&l) => l,
            _ => limits.default_limit,
        };
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of pickup points before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
