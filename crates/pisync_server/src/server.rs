//! Main dashboard server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{HandlerContext, RequestHandler};
use crate::http;
use crate::seed::{seed_devices, seed_logs, DEMO_ACCOUNTS};
use crate::users::{Argon2PasswordService, UserDirectory};
use axum::Router;
use pisync_core::{MemoryDeviceStore, MemoryLogStore};
use std::sync::Arc;
use tracing::info;

/// The dashboard server.
///
/// Owns the device and log stores, the account directory, and the sync
/// simulator, and exposes them over HTTP.
///
/// # Example
///
/// ```
/// use pisync_server::{PiSyncServer, ServerConfig};
///
/// let config = ServerConfig::default().with_demo_data(false);
/// let server = PiSyncServer::new(config).unwrap();
/// assert_eq!(server.device_count(), 0);
///
/// // `server.router()` is an axum router; `server.run()` binds and serves it.
/// ```
pub struct PiSyncServer {
    handler: Arc<RequestHandler>,
    context: Arc<HandlerContext>,
}

impl PiSyncServer {
    /// Creates a server with in-memory stores and Argon2 password hashing.
    ///
    /// With `seed_demo_data` set, the stores start with the demo devices,
    /// their failure logs, and the demo accounts.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let passwords = Arc::new(Argon2PasswordService::new());

        let (devices, logs, users) = if config.seed_demo_data {
            let devices = seed_devices()?;
            let logs = seed_logs(&devices);
            (
                MemoryDeviceStore::from_records(devices)?,
                MemoryLogStore::from_entries(logs),
                UserDirectory::with_accounts(passwords, DEMO_ACCOUNTS)?,
            )
        } else {
            (
                MemoryDeviceStore::new(),
                MemoryLogStore::new(),
                UserDirectory::new(passwords),
            )
        };

        let context = HandlerContext::new(config, Arc::new(devices), Arc::new(logs), users)?;
        Ok(Self::with_context(context))
    }

    /// Creates a server around an existing context.
    pub fn with_context(context: HandlerContext) -> Self {
        let context = Arc::new(context);
        let handler = Arc::new(RequestHandler::new(Arc::clone(&context)));

        Self { handler, context }
    }

    /// Returns the request handler.
    pub fn handler(&self) -> Arc<RequestHandler> {
        Arc::clone(&self.handler)
    }

    /// Builds the HTTP router.
    pub fn router(&self) -> Router {
        http::router(self.handler())
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn run(self) -> ServerResult<()> {
        info!(
            devices = self.device_count(),
            logs = self.log_count(),
            users = self.context.users.len(),
            "starting PiSync server"
        );
        http::serve(self.context.config.bind_addr, self.router()).await
    }

    /// Returns the number of devices.
    pub fn device_count(&self) -> usize {
        self.context.devices.len()
    }

    /// Returns the number of failure-log entries.
    pub fn log_count(&self) -> usize {
        self.context.logs.len()
    }
}
