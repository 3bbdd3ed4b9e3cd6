//! Shared helpers for the behavioral specifications.

use om_core::{FakeClock, MemoryLogger, Meter};
use std::sync::Arc;

/// Meter wired to a collecting logger and a controllable clock.
pub fn meter(category: &str) -> (Meter, Arc<MemoryLogger>, FakeClock) {
    let logger = Arc::new(MemoryLogger::new());
    let clock = FakeClock::new();
    let meter = Meter::with_clock(logger.clone(), Arc::new(clock.clone()), category);
    (meter, logger, clock)
}
