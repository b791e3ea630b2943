//! Device and log record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in time used for sync timestamps.
pub type Timestamp = DateTime<Utc>;

/// Outcome code of a sync attempt.
///
/// These reuse HTTP-like numbers as domain values; they are not transport
/// statuses, although the boundary layer answers a sync request with the
/// same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum SyncStatusCode {
    /// The attempt succeeded.
    Success,
    /// The device rejected the request.
    BadRequest,
    /// The device or its server could not be found.
    NotFound,
    /// The device reported an internal failure.
    ServerError,
}

impl SyncStatusCode {
    /// Returns the numeric code.
    pub fn code(self) -> u16 {
        match self {
            SyncStatusCode::Success => 200,
            SyncStatusCode::BadRequest => 400,
            SyncStatusCode::NotFound => 404,
            SyncStatusCode::ServerError => 500,
        }
    }

    /// Maps a numeric code back to a status, if it is one of the known four.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(SyncStatusCode::Success),
            400 => Some(SyncStatusCode::BadRequest),
            404 => Some(SyncStatusCode::NotFound),
            500 => Some(SyncStatusCode::ServerError),
            _ => None,
        }
    }

    /// Returns true for [`SyncStatusCode::Success`].
    pub fn is_success(self) -> bool {
        self == SyncStatusCode::Success
    }
}

impl From<SyncStatusCode> for u16 {
    fn from(status: SyncStatusCode) -> Self {
        status.code()
    }
}

impl TryFrom<u16> for SyncStatusCode {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        SyncStatusCode::from_code(code).ok_or_else(|| format!("unknown sync status code: {code}"))
    }
}

impl fmt::Display for SyncStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Current sync state of one simulated device.
///
/// `last_sync_at` only moves on a successful attempt. `error_message` is
/// `None` exactly when the most recent attempt succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique, immutable device id.
    pub device_id: String,
    /// Display name.
    pub name: String,
    /// Hardware type.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Last successful sync.
    pub last_sync_at: Option<Timestamp>,
    /// Outcome of the most recent attempt; `None` before the first one.
    pub sync_status_code: Option<SyncStatusCode>,
    /// Failure message of the most recent attempt.
    pub error_message: Option<String>,
    /// Last attempt of any outcome.
    pub last_attempt_at: Option<Timestamp>,
}

impl DeviceRecord {
    /// Creates a device that has never attempted a sync.
    pub fn new(
        device_id: impl Into<String>,
        name: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            name: name.into(),
            device_type: device_type.into(),
            last_sync_at: None,
            sync_status_code: None,
            error_message: None,
            last_attempt_at: None,
        }
    }

    /// Sets the state left by a successful sync at `at`.
    pub fn with_success(mut self, at: Timestamp) -> Self {
        self.last_sync_at = Some(at);
        self.last_attempt_at = Some(at);
        self.sync_status_code = Some(SyncStatusCode::Success);
        self.error_message = None;
        self
    }

    /// Sets the state left by a failed attempt at `at`.
    ///
    /// `last_sync_at` is left as is.
    pub fn with_failure(
        mut self,
        code: SyncStatusCode,
        message: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        self.last_attempt_at = Some(at);
        self.sync_status_code = Some(code);
        self.error_message = Some(message.into());
        self
    }

    /// Sets the last successful sync time.
    pub fn with_last_sync_at(mut self, at: Option<Timestamp>) -> Self {
        self.last_sync_at = at;
        self
    }

    /// Returns the numeric status code, if any attempt was made.
    pub fn status_code(&self) -> Option<u16> {
        self.sync_status_code.map(SyncStatusCode::code)
    }

    /// Returns true if the last attempt failed.
    pub fn is_failing(&self) -> bool {
        matches!(self.sync_status_code, Some(code) if !code.is_success())
    }
}

/// Snapshot of a failed sync attempt.
///
/// Entries are immutable once appended. `device_id` is a plain reference
/// and is not kept in step with the live device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Id of the device that failed.
    pub device_id: String,
    /// Device name at the time of failure.
    pub name: String,
    /// Device type at the time of failure.
    #[serde(rename = "type")]
    pub device_type: String,
    /// Failure message.
    pub error_message: Option<String>,
    /// Time of the failed attempt.
    pub last_attempt_at: Option<Timestamp>,
}

impl LogEntry {
    /// Captures the current state of a device.
    pub fn snapshot(device: &DeviceRecord) -> Self {
        Self {
            device_id: device.device_id.clone(),
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            error_message: device.error_message.clone(),
            last_attempt_at: device.last_attempt_at,
        }
    }
}
