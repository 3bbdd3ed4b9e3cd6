// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic time source abstraction.
//!
//! Every timestamp a meter records goes through a [`Clock`] so tests can
//! drive time deterministically. Wall-clock time is never read.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Monotonic time source.
///
/// Readings are nanoseconds since an arbitrary process-local origin. They
/// never decrease and are always nonzero, so a freshly stamped record has a
/// valid create time.
pub trait Clock: Send + Sync {
    /// Current monotonic reading in nanoseconds.
    fn now_nanos(&self) -> u64;
}

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Production clock backed by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        let origin = ORIGIN.get_or_init(Instant::now);
        (origin.elapsed().as_nanos() as u64).max(1)
    }
}

/// Controllable clock for tests.
///
/// Cloning returns a handle onto the same underlying reading, so a test can
/// keep one handle and advance it while a meter holds another.
#[derive(Debug, Clone)]
pub struct FakeClock {
    nanos: Arc<Mutex<u64>>,
}

/// Initial [`FakeClock`] reading: 1 ms, so created-at timestamps are nonzero.
pub const FAKE_CLOCK_START_NANOS: u64 = 1_000_000;

impl FakeClock {
    pub fn new() -> Self {
        Self {
            nanos: Arc::new(Mutex::new(FAKE_CLOCK_START_NANOS)),
        }
    }

    /// Move the reading forward.
    pub fn advance(&self, duration: Duration) {
        *self.nanos.lock() += duration.as_nanos() as u64;
    }

    /// Set the reading to an absolute value.
    pub fn set_nanos(&self, nanos: u64) {
        *self.nanos.lock() = nanos;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_nanos(&self) -> u64 {
        *self.nanos.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
