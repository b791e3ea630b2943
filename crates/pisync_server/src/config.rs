//! Server configuration.

use crate::error::{ServerError, ServerResult};
use pisync_core::query::DEFAULT_LIMIT;
use pisync_core::{PageLimits, SyncConfig};
use rand::RngCore;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the dashboard server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Secret key for token signing.
    pub auth_secret: Vec<u8>,
    /// How long an issued token stays valid.
    pub token_expiry: Duration,
    /// Sync simulation settings.
    pub sync: SyncConfig,
    /// Seed for the sync RNG. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// Page size bounds for list endpoints.
    pub page_limits: PageLimits,
    /// Whether to load the demo devices, logs and users at start-up.
    pub seed_demo_data: bool,
}

impl ServerConfig {
    /// Creates a new server configuration with a random signing secret.
    pub fn new(bind_addr: SocketAddr) -> Self {
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);

        Self {
            bind_addr,
            auth_secret: secret,
            token_expiry: Duration::from_secs(60 * 60),
            sync: SyncConfig::default(),
            rng_seed: None,
            page_limits: PageLimits::default(),
            seed_demo_data: true,
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps variable names to values.
    ///
    /// `JWT_SECRET` is required. `PISYNC_BIND` takes precedence over `PORT`,
    /// which binds every interface.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        let mut config = Self::default();

        if let Some(bind) = lookup("PISYNC_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PISYNC_BIND: {bind}")))?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PORT: {port}")))?;
            config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }

        let secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ServerError::Config("JWT_SECRET is not set".into()))?;
        config.auth_secret = secret.into_bytes();

        if let Some(rate) = lookup("PISYNC_SYNC_SUCCESS_RATE") {
            let rate: f64 = rate.parse().map_err(|_| {
                ServerError::Config(format!("invalid PISYNC_SYNC_SUCCESS_RATE: {rate}"))
            })?;
            config = config.with_success_threshold(rate);
        }

        if let Some(flag) = lookup("PISYNC_RECORD_FAILURES") {
            let enabled = match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ServerError::Config(format!(
                        "invalid PISYNC_RECORD_FAILURES: {flag}"
                    )))
                }
            };
            config = config.with_failure_log(enabled);
        }

        if let Some(seed) = lookup("PISYNC_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PISYNC_SEED: {seed}")))?;
            config = config.with_rng_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Sets the token signing secret.
    pub fn with_auth_secret(mut self, secret: Vec<u8>) -> Self {
        self.auth_secret = secret;
        self
    }

    /// Sets the token expiry.
    pub fn with_token_expiry(mut self, expiry: Duration) -> Self {
        self.token_expiry = expiry;
        self
    }

    /// Sets the probability that a sync attempt succeeds.
    pub fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.sync = self.sync.with_success_threshold(threshold);
        self
    }

    /// Enables or disables failure-log recording.
    pub fn with_failure_log(mut self, enabled: bool) -> Self {
        self.sync = self.sync.with_failure_log(enabled);
        self
    }

    /// Replaces the whole sync configuration.
    pub fn with_sync_config(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Seeds the sync RNG for reproducible runs.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Sets the maximum page size for list endpoints.
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.page_limits = PageLimits::new(DEFAULT_LIMIT, max);
        self
    }

    /// Enables or disables the demo data set.
    pub fn with_demo_data(mut self, enabled: bool) -> Self {
        self.seed_demo_data = enabled;
        self
    }

    /// Checks the configuration for values the server cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        if self.auth_secret.is_empty() {
            return Err(ServerError::Config("auth secret must not be empty".into()));
        }
        if self.token_expiry.is_zero() {
            return Err(ServerError::Config("token expiry must be positive".into()));
        }
        self.sync
            .validate()
            .map_err(|err| ServerError::Config(err.to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pisync_core::query::MAX_LIMIT;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.auth_secret.len(), 32);
        assert_eq!(config.token_expiry, Duration::from_secs(3600));
        assert_eq!(config.sync.success_threshold, 0.8);
        assert!(config.sync.record_failures);
        assert_eq!(config.page_limits.max_limit, MAX_LIMIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_auth_secret(b"secret".to_vec())
            .with_success_threshold(0.5)
            .with_failure_log(false)
            .with_rng_seed(42)
            .with_max_page_size(5);

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.auth_secret, b"secret".to_vec());
        assert_eq!(config.sync.success_threshold, 0.5);
        assert!(!config.sync.record_failures);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.page_limits.max_limit, 5);
        assert_eq!(config.page_limits.default_limit, 5);
    }

    #[test]
    fn from_env_requires_secret() {
        let err = ServerConfig::from_lookup(env(&[("PORT", "4000")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn from_env_reads_variables() {
        let config = ServerConfig::from_lookup(env(&[
            ("PORT", "4000"),
            ("JWT_SECRET", "s3cret"),
            ("PISYNC_SYNC_SUCCESS_RATE", "0.25"),
            ("PISYNC_RECORD_FAILURES", "off"),
            ("PISYNC_SEED", "7"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:4000".parse().unwrap());
        assert_eq!(config.auth_secret, b"s3cret".to_vec());
        assert_eq!(config.sync.success_threshold, 0.25);
        assert!(!config.sync.record_failures);
        assert_eq!(config.rng_seed, Some(7));
    }

    #[test]
    fn bind_overrides_port() {
        let config = ServerConfig::from_lookup(env(&[
            ("PORT", "4000"),
            ("PISYNC_BIND", "127.0.0.1:5555"),
            ("JWT_SECRET", "x"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:5555".parse().unwrap());
    }

    #[test]
    fn from_env_rejects_malformed_values() {
        for pairs in [
            vec![("JWT_SECRET", "x"), ("PORT", "http")],
            vec![("JWT_SECRET", "x"), ("PISYNC_SYNC_SUCCESS_RATE", "1.5")],
            vec![("JWT_SECRET", "x"), ("PISYNC_RECORD_FAILURES", "maybe")],
            vec![("JWT_SECRET", "x"), ("PISYNC_SEED", "-1")],
        ] {
            assert!(ServerConfig::from_lookup(env(&pairs)).is_err(), "{pairs:?}");
        }
    }
}
