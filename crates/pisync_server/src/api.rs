//! JSON request and response bodies.

use pisync_core::DeviceRecord;
use serde::{Deserialize, Serialize};

/// Body of the register and login requests.
///
/// Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Bearer token for the device endpoints.
    pub token: String,
}

/// Result of a sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// HTTP status for the response: 200 or the failure code.
    #[serde(skip)]
    pub status: u16,
    /// `Device synced successfully` or `Sync failed: <reason>`.
    pub message: String,
    /// Device state after the attempt.
    pub device: DeviceRecord,
}

/// Body carrying only a message, used for every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Entry points listed by the service info route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Authentication routes.
    pub auth: String,
    /// Device routes.
    pub devices: String,
    /// Failure-log route.
    pub logs: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Entry points.
    pub endpoints: Endpoints,
}

impl ServiceInfo {
    /// Describes this server.
    pub fn current() -> Self {
        Self {
            message: "Device Sync Management API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: Endpoints {
                auth: "/pisync/auth".to_string(),
                devices: "/pisync/devices".to_string(),
                logs: "/pisync/logs".to_string(),
            },
        }
    }
}
