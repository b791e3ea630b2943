//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random devices, log entries and
//! query parameters.

use chrono::{Duration, TimeZone, Utc};
use pisync_core::{
    DeviceRecord, LogEntry, QueryParams, SortBy, SortField, SortOrder, StatusFilter,
    SyncStatusCode, Timestamp,
};
use proptest::prelude::*;

/// Strategy for timestamps within April 2025, at minute resolution.
///
/// The small range makes equal keys likely, which is what stability
/// tests need.
pub fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (0i64..30 * 24).prop_map(|hours| {
        Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0)
            .single()
            .expect("Invalid base date")
            + Duration::hours(hours)
    })
}

/// Strategy for optional timestamps (about one in four missing).
pub fn optional_timestamp_strategy() -> impl Strategy<Value = Option<Timestamp>> {
    prop_oneof![1 => Just(None), 3 => timestamp_strategy().prop_map(Some)]
}

/// Strategy for the four known status codes.
pub fn status_strategy() -> impl Strategy<Value = SyncStatusCode> {
    prop_oneof![
        Just(SyncStatusCode::Success),
        Just(SyncStatusCode::BadRequest),
        Just(SyncStatusCode::NotFound),
        Just(SyncStatusCode::ServerError),
    ]
}

/// Strategy for a device with index-based id `index`.
pub fn device_strategy(index: usize) -> impl Strategy<Value = DeviceRecord> {
    (
        optional_timestamp_strategy(),
        optional_timestamp_strategy(),
        prop::option::weighted(0.9, status_strategy()),
    )
        .prop_map(move |(last_sync_at, last_attempt_at, status)| {
            let mut device = DeviceRecord::new(format!("PBX{index:05}"), "Generated", "Pi4");
            device.last_sync_at = last_sync_at;
            device.last_attempt_at = last_attempt_at;
            device.sync_status_code = status;
            device.error_message = match status {
                Some(code) if !code.is_success() => Some("Connection Timeout".to_string()),
                _ => None,
            };
            device
        })
}

/// Strategy for up to `max` devices with unique ids.
pub fn devices_strategy(max: usize) -> impl Strategy<Value = Vec<DeviceRecord>> {
    (0..=max).prop_flat_map(|len| (0..len).map(device_strategy).collect::<Vec<_>>())
}

/// Strategy for up to `max` log entries.
pub fn log_entries_strategy(max: usize) -> impl Strategy<Value = Vec<LogEntry>> {
    devices_strategy(max).prop_map(|devices| devices.iter().map(LogEntry::snapshot).collect())
}

/// Strategy for raw status filter strings, malformed ones included.
pub fn raw_filter_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["200", "400", "404", "500", "302"]).prop_map(String::from),
        prop::sample::select(vec!["!200", "!400", "!404", "!500"]).prop_map(String::from),
        "[!]?[a-z]{1,4}",
        "[!]?[0-9]{1,4}[a-z]{0,2}",
    ]
}

/// Strategy for parsed status filters.
pub fn status_filter_strategy() -> impl Strategy<Value = StatusFilter> {
    raw_filter_strategy().prop_filter_map("empty filter", |raw| StatusFilter::parse(&raw))
}

/// Strategy for sort keys, unsupported ones included.
pub fn sort_by_strategy() -> impl Strategy<Value = SortBy> {
    prop_oneof![
        Just(SortBy::Default),
        Just(SortBy::Field(SortField::LastSyncAt)),
        Just(SortBy::Field(SortField::LastAttemptAt)),
        "[a-z_]{1,8}".prop_map(|raw| SortBy::parse(&raw)),
    ]
}

/// Strategy for complete query parameters.
pub fn query_params_strategy() -> impl Strategy<Value = QueryParams> {
    (
        prop::option::of(status_filter_strategy()),
        prop::option::of(-5i64..20),
        prop::option::of(-5i64..150),
        sort_by_strategy(),
        prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)],
    )
        .prop_map(|(filter, page, limit, sort_by, order)| {
            QueryParams::new()
                .with_filter(filter)
                .with_page(page)
                .with_limit(limit)
                .with_sort_by(sort_by)
                .with_order(order)
        })
}
