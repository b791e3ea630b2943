//! Null-aware timestamp sorting.

use super::record::QueryRecord;
use crate::device::Timestamp;
use std::cmp::Ordering;

/// Timestamp field a record list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// `last_sync_at`
    LastSyncAt,
    /// `last_attempt_at`
    LastAttemptAt,
}

impl SortField {
    /// Parses a field name, accepting snake_case and camelCase spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "last_sync_at" | "lastSyncAt" => Some(SortField::LastSyncAt),
            "last_attempt_at" | "lastAttemptAt" => Some(SortField::LastAttemptAt),
            _ => None,
        }
    }

    /// Returns the wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::LastSyncAt => "last_sync_at",
            SortField::LastAttemptAt => "last_attempt_at",
        }
    }
}

/// Sort direction. Descending unless `asc` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first; missing timestamps first.
    Asc,
    /// Newest first; missing timestamps last.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses a raw order value. Only the exact string `asc` is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Requested sort key before it is checked against a record type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortBy {
    /// No key requested; the record type's default applies.
    #[default]
    Default,
    /// A known field.
    Field(SortField),
    /// A key that names no sortable field. Input order is kept.
    Unsupported(String),
}

impl SortBy {
    /// Parses a raw `sort_by` value.
    pub fn parse(raw: &str) -> Self {
        match SortField::parse(raw) {
            Some(field) => SortBy::Field(field),
            None => SortBy::Unsupported(raw.to_string()),
        }
    }

    /// Resolves the field to sort `R` by, or `None` to keep input order.
    pub fn resolve<R: QueryRecord>(&self) -> Option<SortField> {
        match self {
            SortBy::Default => Some(R::DEFAULT_SORT),
            SortBy::Field(field) if R::SORT_FIELDS.contains(field) => Some(*field),
            SortBy::Field(_) | SortBy::Unsupported(_) => None,
        }
    }
}

/// Compares two optional timestamps.
///
/// Two missing values are equal. A missing value sorts before a present one
/// in ascending order and after it in descending order.
pub fn compare_timestamps(a: Option<Timestamp>, b: Option<Timestamp>, order: SortOrder) -> Ordering {
    match (a, b, order) {
        (None, None, _) => Ordering::Equal,
        (None, Some(_), SortOrder::Asc) => Ordering::Less,
        (None, Some(_), SortOrder::Desc) => Ordering::Greater,
        (Some(_), None, SortOrder::Asc) => Ordering::Greater,
        (Some(_), None, SortOrder::Desc) => Ordering::Less,
        (Some(a), Some(b), SortOrder::Asc) => a.cmp(&b),
        (Some(a), Some(b), SortOrder::Desc) => b.cmp(&a),
    }
}

/// Sorts records in place by `field`. Equal keys keep their relative order.
pub fn sort_records<R: QueryRecord>(records: &mut [R], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| compare_timestamps(a.timestamp(field), b.timestamp(field), order));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceRecord, LogEntry};
    use chrono::{TimeZone, Utc};

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 4, day, 0, 0, 0).unwrap()
    }

    fn device(id: &str, attempt: Option<u32>) -> DeviceRecord {
        let mut device = DeviceRecord::new(id, id, "Pi4");
        device.last_attempt_at = attempt.map(at);
        device
    }

    fn ids(records: &[DeviceRecord]) -> Vec<&str> {
        records.iter().map(|d| d.device_id.as_str()).collect()
    }

    #[test]
    fn parse_fields() {
        assert_eq!(SortField::parse("lastSyncAt"), Some(SortField::LastSyncAt));
        assert_eq!(SortField::parse("last_attempt_at"), Some(SortField::LastAttemptAt));
        assert_eq!(SortField::parse("name"), None);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Desc);
    }

    #[test]
    fn resolve_per_record_type() {
        let by_sync = SortBy::Field(SortField::LastSyncAt);
        assert_eq!(by_sync.resolve::<DeviceRecord>(), Some(SortField::LastSyncAt));
        assert_eq!(by_sync.resolve::<LogEntry>(), None);

        assert_eq!(SortBy::Default.resolve::<DeviceRecord>(), Some(SortField::LastSyncAt));
        assert_eq!(SortBy::Default.resolve::<LogEntry>(), Some(SortField::LastAttemptAt));
        assert_eq!(SortBy::parse("name").resolve::<DeviceRecord>(), None);
    }

    #[test]
    fn desc_is_reverse_chronological() {
        let mut records = vec![device("a", Some(1)), device("b", Some(3)), device("c", Some(2))];
        sort_records(&mut records, SortField::LastAttemptAt, SortOrder::Desc);
        assert_eq!(ids(&records), vec!["b", "c", "a"]);
    }

    #[test]
    fn nulls_first_ascending_last_descending() {
        let mut records = vec![device("a", Some(2)), device("null", None), device("b", Some(1))];

        sort_records(&mut records, SortField::LastAttemptAt, SortOrder::Asc);
        assert_eq!(ids(&records), vec!["null", "b", "a"]);

        sort_records(&mut records, SortField::LastAttemptAt, SortOrder::Desc);
        assert_eq!(ids(&records), vec!["a", "b", "null"]);
    }

    #[test]
    fn equal_keys_are_stable() {
        let mut records = vec![
            device("first", Some(5)),
            device("n1", None),
            device("second", Some(5)),
            device("n2", None),
            device("third", Some(5)),
        ];
        sort_records(&mut records, SortField::LastAttemptAt, SortOrder::Desc);
        assert_eq!(ids(&records), vec!["first", "second", "third", "n1", "n2"]);
    }
}
