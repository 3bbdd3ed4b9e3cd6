// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! om-tracing: `tracing`-backed sink for OpMeter events.
//!
//! Maps each emitted `(level, marker, text)` tuple onto a `tracing` event
//! with the marker as a field, so subscribers can filter and route on it.

use om_core::{Level, Logger, Marker};

/// Logger forwarding meter events to the `tracing` ecosystem.
///
/// The marker wire name is attached as the `marker` field; the human or
/// data payload becomes the event message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, marker: Marker, text: &str) {
        match level {
            Level::Trace => tracing::trace!(marker = marker.as_str(), "{}", text),
            Level::Debug => tracing::debug!(marker = marker.as_str(), "{}", text),
            Level::Info => tracing::info!(marker = marker.as_str(), "{}", text),
            Level::Warn => tracing::warn!(marker = marker.as_str(), "{}", text),
            Level::Error => tracing::error!(marker = marker.as_str(), "{}", text),
        }
    }

    fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Trace => tracing::enabled!(tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(tracing::Level::INFO),
            Level::Warn => tracing::enabled!(tracing::Level::WARN),
            Level::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
