//! Error types for PiSync core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PiSync core operations.
///
/// Malformed query input is never an error here: the query engine clamps
/// or ignores it. Only lookups of unknown devices fail hard.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No device with the given id exists in the store.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Invalid simulator configuration.
    #[error("invalid sync configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Store state is inconsistent (e.g. index points past the end).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Creates a device not found error.
    pub fn device_not_found(id: impl Into<String>) -> Self {
        Self::DeviceNotFound(id.into())
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the caller can correct the request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::DeviceNotFound(_))
    }
}
