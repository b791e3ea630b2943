//! Serve command implementation.

use pisync_server::{PiSyncServer, ServerConfig};
use std::net::SocketAddr;

/// Options for the serve command. `None` leaves the environment value in place.
#[derive(Debug, Default, Clone)]
pub struct ServeOptions {
    /// Bind address, overriding `PISYNC_BIND` and `PORT`.
    pub bind: Option<SocketAddr>,
    /// Token secret, overriding `JWT_SECRET`.
    pub secret: Option<String>,
    /// Success probability, overriding `PISYNC_SYNC_SUCCESS_RATE`.
    pub success_rate: Option<f64>,
    /// Disables failure-log recording.
    pub no_failure_log: bool,
    /// RNG seed, overriding `PISYNC_SEED`.
    pub seed: Option<u64>,
    /// Maximum page size for list endpoints.
    pub max_page_size: Option<usize>,
    /// Starts with empty stores.
    pub no_demo_data: bool,
}

/// Resolves the server configuration: flags first, then the environment.
pub fn resolve_config(
    options: &ServeOptions,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_lookup(|key| {
        let flag = match key {
            "PISYNC_BIND" => options.bind.map(|addr| addr.to_string()),
            "JWT_SECRET" => options.secret.clone(),
            "PISYNC_SYNC_SUCCESS_RATE" => options.success_rate.map(|rate| rate.to_string()),
            "PISYNC_SEED" => options.seed.map(|seed| seed.to_string()),
            _ => None,
        };
        flag.or_else(|| env(key))
    })?;

    if options.no_failure_log {
        config = config.with_failure_log(false);
    }
    if let Some(max) = options.max_page_size {
        config = config.with_max_page_size(max);
    }
    if options.no_demo_data {
        config = config.with_demo_data(false);
    }
    Ok(config)
}

/// Runs the serve command.
pub fn run(options: ServeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&options, |key| std::env::var(key).ok())?;
    tracing::info!(
        bind = %config.bind_addr,
        success_threshold = config.sync.success_threshold,
        record_failures = config.sync.record_failures,
        "configuration loaded"
    );

    let server = PiSyncServer::new(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.run())?;
    Ok(())
}
