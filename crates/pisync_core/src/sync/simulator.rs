//! Simulated device sync.

use super::config::{FailureMode, SyncConfig};
use super::random::{Clock, RandomSource, StdRandom, SystemClock};
use crate::device::{DeviceRecord, LogEntry, SyncStatusCode};
use crate::error::{CoreError, CoreResult};
use crate::store::{DeviceStore, LogStore};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The device synced.
    Success,
    /// The attempt failed in the given way.
    Failure(FailureMode),
}

impl SyncOutcome {
    /// Returns true for [`SyncOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success)
    }

    /// Returns the status code recorded for this outcome.
    pub fn status(&self) -> SyncStatusCode {
        match self {
            SyncOutcome::Success => SyncStatusCode::Success,
            SyncOutcome::Failure(mode) => mode.code,
        }
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> String {
        match self {
            SyncOutcome::Success => "Device synced successfully".to_string(),
            SyncOutcome::Failure(mode) => format!("Sync failed: {}", mode.message),
        }
    }
}

/// Outcome of a sync together with the stored device afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// What happened.
    pub outcome: SyncOutcome,
    /// The device as stored after the attempt.
    pub device: DeviceRecord,
}

/// Runs simulated sync attempts against a device store.
///
/// Each attempt is an independent Bernoulli trial: one sample decides
/// success, and a failed attempt draws a second sample to pick the failure
/// mode uniformly.
pub struct SyncSimulator {
    config: SyncConfig,
    random: Mutex<Box<dyn RandomSource>>,
    clock: Arc<dyn Clock>,
}

impl SyncSimulator {
    /// Creates a simulator using OS entropy and the wall clock.
    pub fn new(config: SyncConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            random: Mutex::new(Box::new(StdRandom::from_entropy())),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the random source.
    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Mutex::new(random);
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Attempts to sync the device with the given id.
    ///
    /// Unknown ids fail with [`CoreError::DeviceNotFound`] and leave both
    /// stores untouched. A failure is appended to `logs` when failure
    /// recording is enabled.
    pub fn sync_device(
        &self,
        devices: &dyn DeviceStore,
        logs: &dyn LogStore,
        device_id: &str,
    ) -> CoreResult<SyncReport> {
        let mut outcome = None;

        let device = devices.update(device_id, &mut |current| {
            let now = self.clock.now();
            let attempt = self.draw_outcome();
            let next = match &attempt {
                SyncOutcome::Success => current.clone().with_success(now),
                SyncOutcome::Failure(mode) => {
                    current
                        .clone()
                        .with_failure(mode.code, mode.message.clone(), now)
                }
            };
            outcome = Some(attempt);
            next
        })?;

        let outcome = outcome.ok_or_else(|| {
            CoreError::Internal(format!("store did not apply the sync of {device_id}"))
        })?;

        match &outcome {
            SyncOutcome::Success => {
                info!(device_id, "device synced");
            }
            SyncOutcome::Failure(mode) => {
                info!(device_id, code = mode.code.code(), reason = %mode.message, "device sync failed");
                if self.config.record_failures {
                    logs.append(LogEntry::snapshot(&device));
                } else {
                    debug!(device_id, "failure logging disabled");
                }
            }
        }

        Ok(SyncReport { outcome, device })
    }

    fn draw_outcome(&self) -> SyncOutcome {
        let mut random = self.random.lock();
        if random.next_unit() < self.config.success_threshold {
            return SyncOutcome::Success;
        }

        let modes = &self.config.failure_modes;
        let pick = (random.next_unit() * modes.len() as f64).floor() as usize;
        let mode = &modes[pick.min(modes.len() - 1)];
        SyncOutcome::Failure(mode.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDeviceStore, MemoryLogStore};
    use crate::sync::random::{FixedClock, ScriptedRandom};
    use chrono::{Duration, TimeZone, Utc};

    fn start() -> crate::device::Timestamp {
        Utc.with_ymd_and_hms(2025, 4, 28, 12, 0, 0).unwrap()
    }

    fn stores() -> (MemoryDeviceStore, MemoryLogStore) {
        let synced = DeviceRecord::new("PBX1", "Pi 4", "Pi4").with_success(start() - Duration::days(3));
        let fresh = DeviceRecord::new("PBX2", "Pi Zero", "PiZero");
        (
            MemoryDeviceStore::from_records(vec![synced, fresh]).unwrap(),
            MemoryLogStore::new(),
        )
    }

    fn simulator(samples: Vec<f64>, config: SyncConfig) -> SyncSimulator {
        SyncSimulator::new(config)
            .unwrap()
            .with_random(Box::new(ScriptedRandom::new(samples)))
            .with_clock(Arc::new(FixedClock::new(start())))
    }

    #[test]
    fn success_advances_both_timestamps() {
        let (devices, logs) = stores();
        let sim = simulator(vec![0.7], SyncConfig::default());

        let report = sim.sync_device(&devices, &logs, "PBX1").unwrap();
        assert!(report.outcome.is_success());
        assert_eq!(report.outcome.message(), "Device synced successfully");
        assert_eq!(report.device.last_sync_at, Some(start()));
        assert_eq!(report.device.last_attempt_at, Some(start()));
        assert_eq!(report.device.sync_status_code, Some(SyncStatusCode::Success));
        assert_eq!(report.device.error_message, None);
        assert_eq!(devices.get_by_id("PBX1").unwrap(), report.device);
        assert!(logs.is_empty());
    }

    #[test]
    fn failure_keeps_last_sync_and_logs() {
        let (devices, logs) = stores();
        let before = devices.get_by_id("PBX1").unwrap();
        // 0.9 fails, 0.5 picks the middle failure mode.
        let sim = simulator(vec![0.9, 0.5], SyncConfig::default());

        let report = sim.sync_device(&devices, &logs, "PBX1").unwrap();
        assert_eq!(report.outcome.status(), SyncStatusCode::NotFound);
        assert_eq!(report.outcome.message(), "Sync failed: Server Not Reachable");
        assert_eq!(report.device.last_sync_at, before.last_sync_at);
        assert_eq!(report.device.last_attempt_at, Some(start()));
        assert_eq!(report.device.error_message.as_deref(), Some("Server Not Reachable"));

        let entries = logs.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], LogEntry::snapshot(&report.device));
    }

    #[test]
    fn failure_mode_selection_covers_all() {
        let (devices, logs) = stores();
        let sim = simulator(vec![0.95, 0.0, 0.95, 0.34, 0.95, 0.99], SyncConfig::default());

        let codes: Vec<_> = (0..3)
            .map(|_| sim.sync_device(&devices, &logs, "PBX2").unwrap().outcome.status())
            .collect();
        assert_eq!(
            codes,
            vec![
                SyncStatusCode::BadRequest,
                SyncStatusCode::NotFound,
                SyncStatusCode::ServerError
            ]
        );
        // Never synced, so still no success time.
        assert_eq!(devices.get_by_id("PBX2").unwrap().last_sync_at, None);
    }

    #[test]
    fn threshold_boundary_is_failure() {
        let (devices, logs) = stores();
        let sim = simulator(vec![0.8, 0.0], SyncConfig::default());
        let report = sim.sync_device(&devices, &logs, "PBX1").unwrap();
        assert!(!report.outcome.is_success());
    }

    #[test]
    fn failure_log_can_be_disabled() {
        let (devices, logs) = stores();
        let sim = simulator(vec![0.9, 0.1], SyncConfig::default().with_failure_log(false));

        let report = sim.sync_device(&devices, &logs, "PBX1").unwrap();
        assert!(!report.outcome.is_success());
        assert!(logs.is_empty());
    }

    #[test]
    fn unknown_device_mutates_nothing() {
        let (devices, logs) = stores();
        let before = devices.list();
        let sim = simulator(vec![0.9, 0.1], SyncConfig::default());

        let err = sim.sync_device(&devices, &logs, "PBX404").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(devices.list(), before);
        assert!(logs.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SyncConfig::default().with_success_threshold(2.0);
        assert!(SyncSimulator::new(config).is_err());
    }
}
