//! Injectable randomness and time.

use crate::device::Timestamp;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send {
    /// Returns the next sample.
    fn next_unit(&mut self) -> f64;
}

/// [`RandomSource`] backed by a standard RNG.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeds from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds deterministically, so a run can be reproduced.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// [`RandomSource`] replaying a fixed list of samples in a loop.
///
/// An empty script always yields 0.0.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    /// Creates a source that replays `samples`.
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.next % self.samples.len()];
        self.next = self.next.wrapping_add(1);
        sample
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    /// Creates a clock stopped at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.now.write() = now;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}
