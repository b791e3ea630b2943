//! # PiSync Testkit
//!
//! Test utilities for PiSync.
//!
//! This crate provides:
//! - Record builders and fixed timestamps
//! - A ready-made test world (stores plus a deterministic simulator)
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pisync_testkit::prelude::*;
//!
//! #[test]
//! fn sync_fails_deterministically() {
//!     let world = TestWorld::new(sample_devices(), vec![0.99, 0.0]);
//!     let report = world.sync("PBX1").unwrap();
//!     assert!(!report.outcome.is_success());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
