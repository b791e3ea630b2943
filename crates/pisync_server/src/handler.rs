//! Request handlers for the dashboard endpoints.
//!
//! Handlers are synchronous and transport-agnostic; the HTTP layer decides
//! which thread they run on.

use crate::api::{AuthResponse, Credentials, SyncResponse};
use crate::auth::{AuthConfig, Claims, TokenValidator};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::users::UserDirectory;
use pisync_core::{
    DeviceRecord, DeviceStore, LogEntry, LogStore, Page, QueryEngine, QueryParams, StdRandom,
    SyncSimulator,
};
use std::sync::Arc;
use tracing::info;

/// Shared state for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Device store.
    pub devices: Arc<dyn DeviceStore>,
    /// Failure-log store.
    pub logs: Arc<dyn LogStore>,
    /// Registered accounts.
    pub users: UserDirectory,
    tokens: TokenValidator,
    simulator: SyncSimulator,
    queries: QueryEngine,
}

impl HandlerContext {
    /// Creates a handler context.
    ///
    /// The sync simulator draws from an RNG seeded by `config.rng_seed`, or
    /// from entropy when no seed is set.
    pub fn new(
        config: ServerConfig,
        devices: Arc<dyn DeviceStore>,
        logs: Arc<dyn LogStore>,
        users: UserDirectory,
    ) -> ServerResult<Self> {
        config.validate()?;

        let random = match config.rng_seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };
        let simulator = SyncSimulator::new(config.sync.clone())?.with_random(Box::new(random));
        let tokens = TokenValidator::new(
            AuthConfig::new(config.auth_secret.clone()).with_expiry(config.token_expiry),
        );

        Ok(Self {
            queries: QueryEngine::new(config.page_limits),
            config,
            devices,
            logs,
            users,
            tokens,
            simulator,
        })
    }

    /// Replaces the sync simulator.
    pub fn with_simulator(mut self, simulator: SyncSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Returns the token validator.
    pub fn tokens(&self) -> &TokenValidator {
        &self.tokens
    }
}

/// Handler for dashboard requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Returns the shared context.
    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Registers an account and issues its first token.
    pub fn handle_register(&self, credentials: Credentials) -> ServerResult<AuthResponse> {
        let user = self
            .context
            .users
            .register(&credentials.username, &credentials.password)?;
        let token = self.context.tokens.create_token(user.id, &user.username)?;

        Ok(AuthResponse {
            message: "User registered successfully.".to_string(),
            token,
        })
    }

    /// Checks credentials and issues a token.
    pub fn handle_login(&self, credentials: Credentials) -> ServerResult<AuthResponse> {
        let user = self
            .context
            .users
            .login(&credentials.username, &credentials.password)?;
        let token = self.context.tokens.create_token(user.id, &user.username)?;
        info!(user_id = user.id, username = %user.username, "user logged in");

        Ok(AuthResponse {
            message: "Login successful.".to_string(),
            token,
        })
    }

    /// Validates an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> ServerResult<Claims> {
        self.context.tokens.authenticate_header(header)
    }

    /// Lists devices.
    pub fn handle_list_devices(&self, params: &QueryParams) -> Page<DeviceRecord> {
        self.context.queries.run(&self.context.devices.list(), params)
    }

    /// Simulates a sync attempt for one device.
    ///
    /// A failed attempt is still a successful call; the failure code ends up
    /// in [`SyncResponse::status`].
    pub fn handle_sync_device(&self, device_id: &str) -> ServerResult<SyncResponse> {
        let report = self.context.simulator.sync_device(
            self.context.devices.as_ref(),
            self.context.logs.as_ref(),
            device_id,
        )?;

        Ok(SyncResponse {
            status: report.outcome.status().code(),
            message: report.outcome.message(),
            device: report.device,
        })
    }

    /// Lists failure-log entries.
    pub fn handle_list_logs(&self, params: &QueryParams) -> Page<LogEntry> {
        self.context.queries.run(&self.context.logs.list(), params)
    }
}
