//! Query engine: filter, then sort, then paginate.
//!
//! The same pipeline serves devices and failure logs. It never fails:
//! malformed filters match nothing (or everything, when negated), unknown
//! sort keys keep input order, and page numbers and sizes are clamped.
//!
//! # Example
//!
//! ```
//! use pisync_core::{DeviceRecord, QueryEngine, QueryParams, StatusFilter};
//!
//! let devices = vec![DeviceRecord::new("PBX1", "Pi 4", "Pi4")];
//! let params = QueryParams::new()
//!     .with_filter(StatusFilter::parse("!200"))
//!     .with_limit(Some(5));
//!
//! let page = QueryEngine::default().run(&devices, &params);
//! assert_eq!(page.total_items, 1);
//! assert_eq!(page.limit, 5);
//! ```

mod filter;
mod page;
mod parse;
mod record;
mod sort;

pub use filter::StatusFilter;
pub use page::{clamp_page, paginate, total_pages, Page, PageLimits, DEFAULT_LIMIT, MAX_LIMIT};
pub use parse::{parse_int_prefix, parse_page_number};
pub use record::QueryRecord;
pub use sort::{compare_timestamps, sort_records, SortBy, SortField, SortOrder};

use tracing::debug;

/// Validated query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Status filter; ignored for record types that are not filterable.
    pub filter: Option<StatusFilter>,
    /// Requested 1-based page.
    pub page: Option<i64>,
    /// Requested page size.
    pub limit: Option<i64>,
    /// Requested sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub order: SortOrder,
}

impl QueryParams {
    /// Creates parameters with every value defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status filter.
    pub fn with_filter(mut self, filter: Option<StatusFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the requested page.
    pub fn with_page(mut self, page: Option<i64>) -> Self {
        self.page = page;
        self
    }

    /// Sets the requested page size.
    pub fn with_limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the sort key.
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Sets the sort direction.
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}

/// Runs the filter → sort → paginate pipeline.
///
/// Output depends only on the records and parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine {
    limits: PageLimits,
}

impl QueryEngine {
    /// Creates an engine with custom page size bounds.
    pub fn new(limits: PageLimits) -> Self {
        Self { limits }
    }

    /// Returns the page size bounds.
    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Queries a snapshot of records.
    pub fn run<R: QueryRecord>(&self, records: &[R], params: &QueryParams) -> Page<R> {
        let mut selected = filter_records(records, params.filter.as_ref());

        if let Some(field) = params.sort_by.resolve::<R>() {
            sort_records(&mut selected, field, params.order);
        } else {
            debug!(sort_by = ?params.sort_by, "sort key not applicable, keeping input order");
        }

        let page = paginate(selected, params.page, params.limit, self.limits);
        debug!(
            page = page.page,
            limit = page.limit,
            total_items = page.total_items,
            "query served"
        );
        page
    }
}

/// Applies the status filter to records that support it.
pub fn filter_records<R: QueryRecord>(records: &[R], filter: Option<&StatusFilter>) -> Vec<R> {
    match filter {
        Some(filter) if R::FILTERABLE => records
            .iter()
            .filter(|record| filter.keeps(record.status_code()))
            .cloned()
            .collect(),
        _ => records.to_vec(),
    }
}
