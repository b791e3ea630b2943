//! Record types the query engine can process.

use super::sort::SortField;
use crate::device::{DeviceRecord, LogEntry, Timestamp};

/// A record that can be filtered, sorted and paginated.
pub trait QueryRecord: Clone {
    /// Fields this record type may be sorted by.
    const SORT_FIELDS: &'static [SortField];
    /// Field used when the caller names none.
    const DEFAULT_SORT: SortField;
    /// Whether the status filter applies to this record type.
    const FILTERABLE: bool;

    /// Returns the value of a timestamp field.
    fn timestamp(&self, field: SortField) -> Option<Timestamp>;

    /// Returns the numeric sync status code, if any.
    fn status_code(&self) -> Option<u16>;
}

impl QueryRecord for DeviceRecord {
    const SORT_FIELDS: &'static [SortField] = &[SortField::LastSyncAt, SortField::LastAttemptAt];
    const DEFAULT_SORT: SortField = SortField::LastSyncAt;
    const FILTERABLE: bool = true;

    fn timestamp(&self, field: SortField) -> Option<Timestamp> {
        match field {
            SortField::LastSyncAt => self.last_sync_at,
            SortField::LastAttemptAt => self.last_attempt_at,
        }
    }

    fn status_code(&self) -> Option<u16> {
        DeviceRecord::status_code(self)
    }
}

impl QueryRecord for LogEntry {
    const SORT_FIELDS: &'static [SortField] = &[SortField::LastAttemptAt];
    const DEFAULT_SORT: SortField = SortField::LastAttemptAt;
    const FILTERABLE: bool = false;

    fn timestamp(&self, field: SortField) -> Option<Timestamp> {
        match field {
            SortField::LastAttemptAt => self.last_attempt_at,
            SortField::LastSyncAt => None,
        }
    }

    fn status_code(&self) -> Option<u16> {
        None
    }
}
