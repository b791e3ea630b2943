//! Token authentication for the dashboard server.
//!
//! Tokens are signed with HMAC-SHA256 and carry the user they were issued
//! to together with the issue time, which drives expiry.
//!
//! ## Token Format
//!
//! Tokens are composed of:
//! - 8 bytes: user id (big-endian)
//! - 8 bytes: issue timestamp (Unix millis, big-endian)
//! - N bytes: username (UTF-8)
//! - 32 bytes: HMAC-SHA256 signature over everything before it
//!
//! The whole buffer is URL-safe base64 (no padding) for transport.

use crate::error::{ServerError, ServerResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

const HEADER_LEN: usize = 16;
const SIGNATURE_LEN: usize = 32;

/// Message for a request without a bearer token.
pub const NO_TOKEN_MESSAGE: &str = "No auth token provided";

/// Message for a token that fails validation.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid auth token";

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC.
    pub secret: Vec<u8>,
    /// Token expiration duration.
    pub token_expiry: Duration,
}

impl AuthConfig {
    /// Creates a new auth configuration.
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            token_expiry: Duration::from_secs(60 * 60), // 1 hour
        }
    }

    /// Sets the token expiration duration.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.token_expiry = expiry;
        self
    }
}

/// Identity carried by a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Numeric user id.
    pub user_id: u64,
    /// Username at issue time.
    pub username: String,
    /// Issue time in Unix milliseconds.
    pub issued_at_millis: u64,
}

/// Issues and validates bearer tokens.
#[derive(Clone)]
pub struct TokenValidator {
    config: AuthConfig,
}

impl TokenValidator {
    /// Creates a new token validator.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Returns the token expiry.
    pub fn token_expiry(&self) -> Duration {
        self.config.token_expiry
    }

    /// Creates a token for a user, issued now.
    pub fn create_token(&self, user_id: u64, username: &str) -> ServerResult<String> {
        self.create_token_at(user_id, username, SystemTime::now())
    }

    /// Creates a token for a user, issued at `issued_at`.
    pub fn create_token_at(
        &self,
        user_id: u64,
        username: &str,
        issued_at: SystemTime,
    ) -> ServerResult<String> {
        let mut data = Vec::with_capacity(HEADER_LEN + username.len() + SIGNATURE_LEN);
        data.extend_from_slice(&user_id.to_be_bytes());
        data.extend_from_slice(&unix_millis(issued_at).to_be_bytes());
        data.extend_from_slice(username.as_bytes());

        let signature = self.sign(&data)?;
        data.extend_from_slice(&signature);
        Ok(URL_SAFE_NO_PAD.encode(data))
    }

    /// Validates a token against the current time.
    pub fn validate_token(&self, token: &str) -> ServerResult<Claims> {
        self.validate_token_at(token, SystemTime::now())
    }

    /// Validates a token as if the current time were `now`.
    pub fn validate_token_at(&self, token: &str, now: SystemTime) -> ServerResult<Claims> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| invalid("malformed token encoding"))?;
        if bytes.len() < HEADER_LEN + SIGNATURE_LEN {
            return Err(invalid("token too short"));
        }

        let (data, signature) = bytes.split_at(bytes.len() - SIGNATURE_LEN);
        let mut mac = self.mac()?;
        mac.update(data);
        mac.verify_slice(signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let mut user_id = [0u8; 8];
        user_id.copy_from_slice(&data[0..8]);
        let mut issued_at = [0u8; 8];
        issued_at.copy_from_slice(&data[8..16]);
        let username = std::str::from_utf8(&data[HEADER_LEN..])
            .map_err(|_| invalid("username is not UTF-8"))?;

        let issued_at_millis = u64::from_be_bytes(issued_at);
        let expiry_millis = self.config.token_expiry.as_millis() as u64;
        if unix_millis(now) > issued_at_millis.saturating_add(expiry_millis) {
            return Err(invalid("token expired"));
        }

        Ok(Claims {
            user_id: u64::from_be_bytes(user_id),
            username: username.to_string(),
            issued_at_millis,
        })
    }

    /// Validates the value of an `Authorization` header.
    ///
    /// The token is the second space-separated word, so `Bearer <token>`.
    /// A header without one is rejected as an invalid token.
    pub fn authenticate_header(&self, header: Option<&str>) -> ServerResult<Claims> {
        let header =
            header.ok_or_else(|| ServerError::AuthenticationFailed(NO_TOKEN_MESSAGE.into()))?;
        let token = header.split(' ').nth(1).unwrap_or_default();

        self.validate_token(token).map_err(|err| {
            tracing::warn!(error = %err, "rejected auth token");
            ServerError::AuthenticationFailed(INVALID_TOKEN_MESSAGE.into())
        })
    }

    fn sign(&self, data: &[u8]) -> ServerResult<[u8; SIGNATURE_LEN]> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().into())
    }

    fn mac(&self) -> ServerResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.config.secret)
            .map_err(|err| ServerError::Internal(format!("hmac key rejected: {err}")))
    }
}

fn invalid(reason: &str) -> ServerError {
    ServerError::AuthenticationFailed(reason.to_string())
}

fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
