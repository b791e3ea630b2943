//! # PiSync Server
//!
//! HTTP server for the PiSync device dashboard.
//!
//! This crate provides:
//! - JSON endpoints for listing devices, triggering syncs, and reading the
//!   failure log
//! - Account registration and login (Argon2 password hashes)
//! - Bearer-token authentication (HMAC-SHA256 tokens)
//! - Demo data loaded at start-up
//!
//! # Routes
//!
//! | method | path | auth |
//! |---|---|---|
//! | GET  | `/` | no |
//! | POST | `/pisync/auth/register` | no |
//! | POST | `/pisync/auth/login` | no |
//! | GET  | `/pisync/devices` | yes |
//! | GET  | `/pisync/devices/:id` | yes |
//! | GET  | `/pisync/logs` | yes |
//!
//! `GET /pisync/devices/:id` runs one simulated sync attempt and answers with
//! the attempt's status code.
//!
//! # Authentication
//!
//! ```rust,ignore
//! use pisync_server::{AuthConfig, TokenValidator};
//!
//! let validator = TokenValidator::new(AuthConfig::new(secret));
//! let token = validator.create_token(user_id, "admin")?;
//! // send as `Authorization: Bearer <token>`
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod api;
mod auth;
mod config;
mod error;
mod handler;
mod http;
mod params;
mod seed;
mod server;
mod users;

pub use api::{AuthResponse, Credentials, Endpoints, MessageResponse, ServiceInfo, SyncResponse};
pub use auth::{AuthConfig, Claims, TokenValidator, INVALID_TOKEN_MESSAGE, NO_TOKEN_MESSAGE};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use http::{router, serve};
pub use params::RawQuery;
pub use seed::{seed_devices, seed_logs, DEMO_ACCOUNTS};
pub use server::PiSyncServer;
pub use users::{Argon2PasswordService, PasswordService, User, UserDirectory};
