//! # PiSync Core
//!
//! In-memory core of the PiSync device dashboard.
//!
//! This crate provides:
//! - Device and failure-log records
//! - A query engine (status filter, null-aware date sort, clamped pagination)
//!   shared by devices and logs
//! - A sync simulator with injectable randomness and time
//! - Device and log store traits with in-memory implementations
//!
//! ## Key Invariants
//!
//! - `last_sync_at` only advances on a successful attempt
//! - `error_message` is `None` exactly when the last attempt succeeded
//! - Queries never fail; malformed input is clamped or ignored
//! - Syncing an unknown device changes no store
//!
//! This crate performs no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod device;
mod error;
pub mod query;
mod store;
pub mod sync;

pub use device::{DeviceRecord, LogEntry, SyncStatusCode, Timestamp};
pub use error::{CoreError, CoreResult};
pub use query::{
    Page, PageLimits, QueryEngine, QueryParams, QueryRecord, SortBy, SortField, SortOrder,
    StatusFilter,
};
pub use store::{DeviceStore, LogStore, MemoryDeviceStore, MemoryLogStore};
pub use sync::{
    Clock, FailureMode, FixedClock, RandomSource, ScriptedRandom, StdRandom, SyncConfig,
    SyncOutcome, SyncReport, SyncSimulator, SystemClock,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
