//! Configuration for the sync simulator.

use crate::device::SyncStatusCode;
use crate::error::{CoreError, CoreResult};

/// Default probability that a sync attempt succeeds.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 0.8;

/// One way a simulated sync can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMode {
    /// Status code recorded on the device.
    pub code: SyncStatusCode,
    /// Error message recorded on the device.
    pub message: String,
}

impl FailureMode {
    /// Creates a failure mode.
    pub fn new(code: SyncStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The stock failure set.
    pub fn defaults() -> Vec<FailureMode> {
        vec![
            FailureMode::new(SyncStatusCode::BadRequest, "Connection Timeout"),
            FailureMode::new(SyncStatusCode::NotFound, "Server Not Reachable"),
            FailureMode::new(SyncStatusCode::ServerError, "Unknown Sync Error"),
        ]
    }
}

/// Configuration for simulated sync attempts.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// An attempt succeeds when the random sample is below this value.
    pub success_threshold: f64,
    /// Failure modes, picked uniformly on failure.
    pub failure_modes: Vec<FailureMode>,
    /// Whether failed attempts are appended to the log store.
    pub record_failures: bool,
}

impl SyncConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            failure_modes: FailureMode::defaults(),
            record_failures: true,
        }
    }

    /// Sets the success threshold.
    pub fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Replaces the failure modes.
    pub fn with_failure_modes(mut self, modes: Vec<FailureMode>) -> Self {
        self.failure_modes = modes;
        self
    }

    /// Enables or disables failure logging.
    pub fn with_failure_log(mut self, enabled: bool) -> Self {
        self.record_failures = enabled;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(CoreError::invalid_config(format!(
                "success threshold must be within [0, 1], got {}",
                self.success_threshold
            )));
        }
        if self.failure_modes.is_empty() {
            return Err(CoreError::invalid_config("at least one failure mode is required"));
        }
        if let Some(mode) = self.failure_modes.iter().find(|m| m.code.is_success()) {
            return Err(CoreError::invalid_config(format!(
                "failure mode '{}' uses the success code",
                mode.message
            )));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
