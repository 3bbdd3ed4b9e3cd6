// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use std::sync::Arc;

use crate::clock::FakeClock;
use crate::logger::MemoryLogger;
use crate::meter::Meter;

/// Meter wired to a fresh collecting logger and a controllable clock.
///
/// Returns the meter plus handles onto the logger and the clock.
pub fn test_meter(category: &str) -> (Meter, Arc<MemoryLogger>, FakeClock) {
    let logger = Arc::new(MemoryLogger::new());
    let clock = FakeClock::new();
    let meter = Meter::with_clock(logger.clone(), Arc::new(clock.clone()), category);
    (meter, logger, clock)
}
