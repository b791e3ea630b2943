//! Error types for the server.

use pisync_core::CoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request format.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Registration with a username that is already in use.
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No route matches the request.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    PasswordHash(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        match self {
            ServerError::InvalidRequest(_)
            | ServerError::UsernameTaken(_)
            | ServerError::AuthenticationFailed(_)
            | ServerError::RouteNotFound(_) => true,
            ServerError::Core(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::InvalidRequest(_) | ServerError::UsernameTaken(_) => 400,
            ServerError::AuthenticationFailed(_) => 401,
            ServerError::RouteNotFound(_) => 404,
            ServerError::Core(err) if err.is_not_found() => 404,
            _ => 500,
        }
    }

    /// Returns the message that may be shown to the caller.
    ///
    /// Server errors return `None`; their details stay in the logs.
    pub fn public_message(&self) -> Option<String> {
        match self {
            ServerError::InvalidRequest(message) | ServerError::AuthenticationFailed(message) => {
                Some(message.clone())
            }
            ServerError::UsernameTaken(_) => Some("Username already exists".to_string()),
            ServerError::RouteNotFound(_) => Some("Route not found".to_string()),
            ServerError::Core(CoreError::DeviceNotFound(id)) => {
                Some(format!("Device with ID {id} not found"))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::InvalidRequest("bad".into()).is_client_error());
        assert!(ServerError::Internal("oops".into()).is_server_error());
        assert!(!ServerError::InvalidRequest("bad".into()).is_server_error());
        assert!(ServerError::Core(CoreError::device_not_found("x")).is_client_error());
        assert!(ServerError::Core(CoreError::Internal("x".into())).is_server_error());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ServerError::UsernameTaken("a".into()).status_code(), 400);
        assert_eq!(ServerError::AuthenticationFailed("x".into()).status_code(), 401);
        assert_eq!(ServerError::Core(CoreError::device_not_found("x")).status_code(), 404);
        assert_eq!(ServerError::PasswordHash("x".into()).status_code(), 500);
    }

    #[test]
    fn public_messages_hide_internals() {
        let err = ServerError::Core(CoreError::device_not_found("PBX9"));
        assert_eq!(err.public_message().unwrap(), "Device with ID PBX9 not found");

        let err = ServerError::Internal("lock poisoned at store.rs:42".into());
        assert!(err.public_message().is_none());
    }
}
