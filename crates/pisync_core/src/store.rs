//! Device and log stores.
//!
//! The traits are what the simulator and the request handler see; the
//! in-memory implementations are the only ones shipped. A persistent store
//! would implement the same traits.

use crate::device::{DeviceRecord, LogEntry};
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Ordered, id-indexed collection of devices.
pub trait DeviceStore: Send + Sync {
    /// Returns a copy of the device with the given id.
    fn get_by_id(&self, id: &str) -> Option<DeviceRecord>;

    /// Replaces the stored device that has the same id.
    fn replace(&self, record: DeviceRecord) -> CoreResult<()>;

    /// Reads, transforms and replaces one device under a single write lock.
    ///
    /// Two concurrent updates of the same id are serialized. Returns the
    /// stored result.
    fn update(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&DeviceRecord) -> DeviceRecord,
    ) -> CoreResult<DeviceRecord>;

    /// Returns a snapshot of all devices in store order.
    fn list(&self) -> Vec<DeviceRecord>;

    /// Returns the number of devices.
    fn len(&self) -> usize;

    /// Returns true if the store holds no devices.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only collection of failure log entries.
pub trait LogStore: Send + Sync {
    /// Appends an entry.
    fn append(&self, entry: LogEntry);

    /// Returns a snapshot of all entries in append order.
    fn list(&self) -> Vec<LogEntry>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns true if no entry was appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct DeviceTable {
    records: Vec<DeviceRecord>,
    /// device_id -> position in `records`.
    index: HashMap<String, usize>,
}

impl DeviceTable {
    fn position(&self, id: &str) -> CoreResult<usize> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| CoreError::device_not_found(id))?;
        if pos >= self.records.len() {
            return Err(CoreError::Internal(format!(
                "index for {id} points past the end ({pos} >= {})",
                self.records.len()
            )));
        }
        Ok(pos)
    }
}

/// In-memory device store.
pub struct MemoryDeviceStore {
    table: RwLock<DeviceTable>,
}

impl MemoryDeviceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(DeviceTable {
                records: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Creates a store holding `records` in the given order.
    ///
    /// Fails if two records share an id.
    pub fn from_records(records: Vec<DeviceRecord>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.device_id.clone(), pos).is_some() {
                return Err(CoreError::Internal(format!(
                    "duplicate device id in seed data: {}",
                    record.device_id
                )));
            }
        }
        Ok(Self {
            table: RwLock::new(DeviceTable { records, index }),
        })
    }
}

impl Default for MemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore for MemoryDeviceStore {
    fn get_by_id(&self, id: &str) -> Option<DeviceRecord> {
        let table = self.table.read();
        let pos = table.position(id).ok()?;
        Some(table.records[pos].clone())
    }

    fn replace(&self, record: DeviceRecord) -> CoreResult<()> {
        let mut table = self.table.write();
        let pos = table.position(&record.device_id)?;
        table.records[pos] = record;
        Ok(())
    }

    fn update(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&DeviceRecord) -> DeviceRecord,
    ) -> CoreResult<DeviceRecord> {
        let mut table = self.table.write();
        let pos = table.position(id)?;
        let updated = apply(&table.records[pos]);
        if updated.device_id != id {
            return Err(CoreError::Internal(format!(
                "update of {id} changed the device id to {}",
                updated.device_id
            )));
        }
        table.records[pos] = updated.clone();
        Ok(updated)
    }

    fn list(&self) -> Vec<DeviceRecord> {
        self.table.read().records.clone()
    }

    fn len(&self) -> usize {
        self.table.read().records.len()
    }
}

/// In-memory log store.
#[derive(Default)]
pub struct MemoryLogStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl MemoryLogStore {
    /// Creates an empty log store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log store holding `entries`.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl LogStore for MemoryLogStore {
    fn append(&self, entry: LogEntry) {
        self.entries.write().push(entry);
    }

    fn list(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SyncStatusCode;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;

    fn devices() -> Vec<DeviceRecord> {
        vec![
            DeviceRecord::new("PBX1", "One", "Pi4"),
            DeviceRecord::new("PBX2", "Two", "PiZero"),
            DeviceRecord::new("PBX3", "Three", "CM4"),
        ]
    }

    #[test]
    fn lookup_and_list_order() {
        let store = MemoryDeviceStore::from_records(devices()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get_by_id("PBX2").unwrap().name, "Two");
        assert!(store.get_by_id("PBX9").is_none());

        let ids: Vec<_> = store.list().into_iter().map(|d| d.device_id).collect();
        assert_eq!(ids, vec!["PBX1", "PBX2", "PBX3"]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut records = devices();
        records.push(DeviceRecord::new("PBX1", "Again", "Pi4"));
        assert!(MemoryDeviceStore::from_records(records).is_err());
    }

    #[test]
    fn replace_keeps_position() {
        let store = MemoryDeviceStore::from_records(devices()).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let updated = store.get_by_id("PBX2").unwrap().with_success(at);

        store.replace(updated.clone()).unwrap();
        assert_eq!(store.list()[1], updated);
    }

    #[test]
    fn replace_unknown_fails() {
        let store = MemoryDeviceStore::new();
        let err = store.replace(DeviceRecord::new("nope", "x", "y")).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn update_cannot_change_id() {
        let store = MemoryDeviceStore::from_records(devices()).unwrap();
        let result = store.update("PBX1", &mut |d| {
            let mut d = d.clone();
            d.device_id = "PBX9".into();
            d
        });
        assert!(matches!(result, Err(CoreError::Internal(_))));
        assert!(store.get_by_id("PBX1").is_some());
    }

    #[test]
    fn concurrent_updates_on_one_id_do_not_lose_writes() {
        let store = Arc::new(MemoryDeviceStore::from_records(devices()).unwrap());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store
                            .update("PBX1", &mut |d| {
                                let mut d = d.clone();
                                d.name.push('x');
                                d
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(store.get_by_id("PBX1").unwrap().name.len(), "One".len() + 400);
    }

    #[test]
    fn log_store_appends_in_order() {
        let logs = MemoryLogStore::new();
        assert!(logs.is_empty());

        let at = Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap();
        for id in ["a", "b"] {
            let device = DeviceRecord::new(id, id, "Pi4").with_failure(
                SyncStatusCode::ServerError,
                "Unknown Sync Error",
                at,
            );
            logs.append(LogEntry::snapshot(&device));
        }

        let ids: Vec<_> = logs.list().into_iter().map(|e| e.device_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(logs.len(), 2);
    }
}
