//! Demo data loaded at start-up.

use crate::error::{ServerError, ServerResult};
use chrono::{DateTime, Utc};
use pisync_core::{DeviceRecord, LogEntry, SyncStatusCode, Timestamp};

/// Demo accounts as `(username, password)` pairs.
pub const DEMO_ACCOUNTS: &[(&str, &str)] = &[
    ("rahulsharma", "rahulsharma123"),
    ("rahulsharmadev", "rahulsharmadev123"),
    ("admin", "admin123"),
];

struct SeedDevice {
    id: &'static str,
    name: &'static str,
    kind: &'static str,
    last_sync_at: &'static str,
    status: u16,
    error: Option<&'static str>,
    last_attempt_at: &'static str,
}

const fn ok(
    id: &'static str,
    name: &'static str,
    kind: &'static str,
    at: &'static str,
) -> SeedDevice {
    SeedDevice {
        id,
        name,
        kind,
        last_sync_at: at,
        status: 200,
        error: None,
        last_attempt_at: at,
    }
}

const fn failed(
    id: &'static str,
    name: &'static str,
    kind: &'static str,
    last_sync_at: &'static str,
    status: u16,
    error: &'static str,
    last_attempt_at: &'static str,
) -> SeedDevice {
    SeedDevice {
        id,
        name,
        kind,
        last_sync_at,
        status,
        error: Some(error),
        last_attempt_at,
    }
}

const SEED_DEVICES: &[SeedDevice] = &[
    ok("PBX00121", "Raspberry Pi 4B", "Pi4", "2025-04-23T14:30:25Z"),
    SeedDevice {
        id: "PBX00122",
        name: "Pi Zero W",
        kind: "PiZero",
        last_sync_at: "2025-04-15T09:45:12Z",
        status: 200,
        error: None,
        last_attempt_at: "2025-04-26T11:20:33Z",
    },
    failed("PBX00123", "Raspberry Pi 3B+", "Pi3", "2025-04-10T16:22:08Z", 400, "Connection Timeout", "2025-04-27T18:15:42Z"),
    failed("PBX00104", "Compute Module 4", "CM4", "2025-04-05T08:10:30Z", 500, "Server Not Reachable", "2025-04-25T10:05:18Z"),
    failed("PBX00105", "Pi 400", "Pi400", "2025-04-05T08:10:30Z", 500, "Server Not Reachable", "2025-04-25T10:05:18Z"),
    ok("PBX00106", "Pi Zero 2W", "PiZero2", "2025-04-20T11:42:15Z"),
    ok("PBX00107", "Raspberry Pi 4 - 8GB", "Pi4-8GB", "2025-04-22T09:33:18Z"),
    ok("PBX00109", "Raspberry Pi 3A+", "Pi3A", "2025-04-18T08:55:42Z"),
    failed("PBX00110", "Pi 4 - Kiosk Display", "Pi4", "2025-04-14T10:22:35Z", 400, "Configuration error", "2025-04-27T16:45:12Z"),
    ok("PBX00111", "Pi Zero - Camera Module", "PiZero", "2025-04-11T07:33:19Z"),
    ok("PBX00112", "Pi 3B - Weather Station", "Pi3", "2025-04-17T12:40:27Z"),
    failed("PBX00113", "Compute Module 3+", "CM3", "2025-04-02T16:18:55Z", 500, "Database connection failed", "2025-04-25T08:12:33Z"),
    ok("PBX00114", "Pi 4 - Lab Controller", "Pi4", "2025-04-21T15:23:41Z"),
    ok("PBX00115", "Pi 3B+ Media Center", "Pi3", "2025-04-19T18:11:02Z"),
    failed("PBX00116", "Pi Zero W - IoT Sensor", "PiZero", "2025-04-03T09:27:14Z", 400, "Sensor calibration error", "2025-04-24T11:36:50Z"),
    ok("PBX00117", "CM4 - Industrial Control", "CM4", "2025-04-16T07:55:23Z"),
    ok("PBX00118", "Pi 400 - Educational Kit", "Pi400", "2025-04-24T13:45:19Z"),
    ok("PBX00120", "Pi 3A+ - Digital Signage", "Pi3A", "2025-04-13T14:38:27Z"),
    failed("PBX00124", "Pi Zero - Wildlife Camera", "PiZero", "2025-04-09T06:12:33Z", 400, "Low power mode active", "2025-04-25T16:45:22Z"),
    ok("PBX00125", "Pi 4 - Home Assistant", "Pi4", "2025-04-01T10:18:42Z"),
    failed("PBX00126", "CM4 - Robotics Platform", "CM4", "2025-04-06T15:30:58Z", 500, "API version mismatch", "2025-04-28T08:22:17Z"),
    ok("PBX00127", "Pi 3B+ - NAS Server", "Pi3", "2025-04-07T09:44:51Z"),
    ok("PBX00128", "Pi 400 - Classroom", "Pi400", "2025-04-04T11:28:37Z"),
];

impl SeedDevice {
    fn to_record(&self) -> ServerResult<DeviceRecord> {
        let status = SyncStatusCode::from_code(self.status).ok_or_else(|| {
            ServerError::Internal(format!("seed device {} has status {}", self.id, self.status))
        })?;

        let mut device = DeviceRecord::new(self.id, self.name, self.kind);
        device.last_sync_at = Some(parse_time(self.last_sync_at)?);
        device.last_attempt_at = Some(parse_time(self.last_attempt_at)?);
        device.sync_status_code = Some(status);
        device.error_message = self.error.map(str::to_string);
        Ok(device)
    }
}

fn parse_time(raw: &str) -> ServerResult<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| ServerError::Internal(format!("bad seed timestamp {raw}: {e}")))
}

/// Returns the demo devices in their fixed order.
pub fn seed_devices() -> ServerResult<Vec<DeviceRecord>> {
    SEED_DEVICES.iter().map(SeedDevice::to_record).collect()
}

/// Returns one log entry per demo device whose last attempt failed.
pub fn seed_logs(devices: &[DeviceRecord]) -> Vec<LogEntry> {
    devices
        .iter()
        .filter(|device| device.is_failing())
        .map(LogEntry::snapshot)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_devices_parse() {
        let devices = seed_devices().unwrap();
        assert_eq!(devices.len(), 23);
        assert_eq!(devices[0].device_id, "PBX00121");
        assert_eq!(devices[22].device_id, "PBX00128");

        let ids: HashSet<_> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids.len(), devices.len());
    }

    #[test]
    fn seed_devices_respect_error_invariant() {
        for device in seed_devices().unwrap() {
            assert_eq!(device.is_failing(), device.error_message.is_some(), "{}", device.device_id);
        }
    }

    #[test]
    fn seed_logs_cover_failures_in_order() {
        let devices = seed_devices().unwrap();
        let logs = seed_logs(&devices);

        let ids: Vec<_> = logs.iter().map(|l| l.device_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "PBX00123", "PBX00104", "PBX00105", "PBX00110", "PBX00113", "PBX00116",
                "PBX00124", "PBX00126"
            ]
        );
        assert_eq!(logs[0].error_message.as_deref(), Some("Connection Timeout"));
    }

    #[test]
    fn demo_accounts_are_unique() {
        let names: HashSet<_> = DEMO_ACCOUNTS.iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), DEMO_ACCOUNTS.len());
    }
}
