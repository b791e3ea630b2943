//! Test fixtures and store helpers.

use chrono::{Duration, TimeZone, Utc};
use pisync_core::{
    CoreResult, DeviceRecord, FixedClock, LogEntry, MemoryDeviceStore, MemoryLogStore,
    ScriptedRandom, SyncConfig, SyncReport, SyncSimulator, SyncStatusCode, Timestamp,
};
use std::sync::Arc;

/// Midnight UTC on the given day of April 2025, plus `hour` hours.
pub fn april(day: u32, hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0)
        .single()
        .expect("Invalid fixture date")
}

/// Time the [`TestWorld`] clock starts at.
pub fn test_now() -> Timestamp {
    april(28, 12)
}

/// A device that last synced successfully at `at`.
pub fn synced_device(id: &str, at: Timestamp) -> DeviceRecord {
    DeviceRecord::new(id, format!("Device {id}"), "Pi4").with_success(at)
}

/// A device whose last attempt at `attempt` failed after a success at `synced`.
pub fn failing_device(
    id: &str,
    code: SyncStatusCode,
    synced: Option<Timestamp>,
    attempt: Timestamp,
) -> DeviceRecord {
    DeviceRecord::new(id, format!("Device {id}"), "PiZero")
        .with_failure(code, "Connection Timeout", attempt)
        .with_last_sync_at(synced)
}

/// A device that never attempted a sync.
pub fn fresh_device(id: &str) -> DeviceRecord {
    DeviceRecord::new(id, format!("Device {id}"), "CM4")
}

/// Three successful devices, one failing device and one fresh device.
pub fn sample_devices() -> Vec<DeviceRecord> {
    vec![
        synced_device("PBX1", april(20, 9)),
        synced_device("PBX2", april(22, 9)),
        failing_device("PBX3", SyncStatusCode::BadRequest, Some(april(10, 9)), april(27, 9)),
        synced_device("PBX4", april(21, 9)),
        fresh_device("PBX5"),
    ]
}

/// Stores plus a simulator driven by scripted samples and a fixed clock.
pub struct TestWorld {
    /// Device store.
    pub devices: MemoryDeviceStore,
    /// Log store.
    pub logs: MemoryLogStore,
    /// Simulator under test.
    pub simulator: SyncSimulator,
    /// Clock used by the simulator.
    pub clock: Arc<FixedClock>,
}

impl TestWorld {
    /// Creates a world with the default sync configuration.
    pub fn new(devices: Vec<DeviceRecord>, samples: Vec<f64>) -> Self {
        Self::with_config(devices, samples, SyncConfig::default())
    }

    /// Creates a world with a custom sync configuration.
    pub fn with_config(devices: Vec<DeviceRecord>, samples: Vec<f64>, config: SyncConfig) -> Self {
        let clock = Arc::new(FixedClock::new(test_now()));
        let simulator = SyncSimulator::new(config)
            .expect("Invalid sync configuration")
            .with_random(Box::new(ScriptedRandom::new(samples)))
            .with_clock(clock.clone());

        Self {
            devices: MemoryDeviceStore::from_records(devices).expect("Duplicate fixture ids"),
            logs: MemoryLogStore::new(),
            simulator,
            clock,
        }
    }

    /// Seeds the log store.
    pub fn with_logs(mut self, entries: Vec<LogEntry>) -> Self {
        self.logs = MemoryLogStore::from_entries(entries);
        self
    }

    /// Syncs a device.
    pub fn sync(&self, device_id: &str) -> CoreResult<SyncReport> {
        self.simulator
            .sync_device(&self.devices, &self.logs, device_id)
    }

    /// Moves the clock forward by `minutes`.
    pub fn tick(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pisync_core::{DeviceStore, LogStore};

    #[test]
    fn sample_devices_are_unique() {
        let devices = sample_devices();
        let store = MemoryDeviceStore::from_records(devices.clone()).unwrap();
        assert_eq!(store.len(), devices.len());
    }

    #[test]
    fn world_replays_samples() {
        let world = TestWorld::new(sample_devices(), vec![0.1, 0.99, 0.0]);

        let first = world.sync("PBX1").unwrap();
        assert!(first.outcome.is_success());
        assert_eq!(first.device.last_sync_at, Some(test_now()));

        world.tick(10);
        let second = world.sync("PBX1").unwrap();
        assert_eq!(second.outcome.status(), SyncStatusCode::BadRequest);
        assert_eq!(second.device.last_sync_at, Some(test_now()));
        assert_eq!(world.logs.len(), 1);
    }
}
