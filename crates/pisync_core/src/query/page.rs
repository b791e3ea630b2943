//! Clamped pagination.

use serde::{Deserialize, Serialize};

/// Default page size when none (or an invalid one) is given.
pub const DEFAULT_LIMIT: usize = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: usize = 100;

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based page number actually served.
    pub page: usize,
    /// Page size actually used.
    pub limit: usize,
    /// Number of records after filtering.
    pub total_items: usize,
    /// Number of pages; at least 1.
    pub total_pages: usize,
    /// Records on this page.
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Maps the records on this page, keeping the counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Page size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Size used when none is requested.
    pub default_limit: usize,
    /// Upper bound on the requested size.
    pub max_limit: usize,
}

impl PageLimits {
    /// Creates page limits. `max_limit` is raised to at least 1 and the
    /// default is kept within `[1, max_limit]`.
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Clamps a requested page size into `[1, max_limit]`.
    pub fn clamp_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default_limit,
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(self.max_limit),
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}

/// Number of pages needed for `total_items`; an empty result has one page.
pub fn total_pages(total_items: usize, limit: usize) -> usize {
    total_items.div_ceil(limit.max(1)).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(requested: Option<i64>, total_pages: usize) -> usize {
    let total_pages = total_pages.max(1);
    match requested {
        None => 1,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(total_pages),
    }
}

/// Cuts one page out of `items`.
///
/// Out-of-range page numbers are corrected, never rejected.
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<i64>,
    limit: Option<i64>,
    limits: PageLimits,
) -> Page<T> {
    let limit = limits.clamp_limit(limit);
    let total_items = items.len();
    let total_pages = total_pages(total_items, limit);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * limit).min(total_items);
    let end = (start + limit).min(total_items);

    let data = items.into_iter().skip(start).take(end - start).collect();

    Page {
        page,
        limit,
        total_items,
        total_pages,
        data,
    }
}
