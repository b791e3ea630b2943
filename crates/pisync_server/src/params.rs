//! Query-string parameters for the list endpoints.

use pisync_core::query::parse_page_number;
use pisync_core::{QueryParams, SortBy, SortOrder, StatusFilter};
use serde::Deserialize;

/// List parameters exactly as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuery {
    /// Status filter, optionally negated with a leading `!`.
    pub sync_status_code: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Sort key.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

impl RawQuery {
    /// Converts the raw strings into query parameters. Never fails.
    pub fn into_params(self) -> QueryParams {
        QueryParams::new()
            .with_filter(self.sync_status_code.as_deref().and_then(StatusFilter::parse))
            .with_page(self.page.as_deref().and_then(parse_page_number))
            .with_limit(self.limit.as_deref().and_then(parse_page_number))
            .with_sort_by(self.sort_by.as_deref().map_or(SortBy::Default, SortBy::parse))
            .with_order(self.order.as_deref().map_or(SortOrder::Desc, SortOrder::parse))
    }
}
