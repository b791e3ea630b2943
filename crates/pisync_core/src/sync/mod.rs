//! Simulated per-device sync.
//!
//! There is no real device connectivity. An attempt is a weighted coin
//! flip whose outcome is written back to the device store, and failures
//! are optionally appended to the log store.

mod config;
mod random;
mod simulator;

pub use config::{FailureMode, SyncConfig, DEFAULT_SUCCESS_THRESHOLD};
pub use random::{Clock, FixedClock, RandomSource, ScriptedRandom, StdRandom, SystemClock};
pub use simulator::{SyncOutcome, SyncReport, SyncSimulator};
