// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log-event sink contract.
//!
//! A meter never writes anywhere itself; it hands `(level, marker, text)`
//! tuples to an injected [`Logger`]. The marker set is fixed and consumers
//! route on it: `MSG_*` markers carry the human-readable line, `DATA_*`
//! markers carry the serialized record envelope, and the diagnostic markers
//! report misuse of the meter API.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an emitted log event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Trace
    }
}

/// Routing tag attached to every emitted log event.
///
/// The set is fixed; the `Display` names are the stable wire names consumers
/// filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Marker {
    MsgStart,
    DataStart,
    MsgProgress,
    DataProgress,
    DataSlowProgress,
    MsgOk,
    DataOk,
    MsgSlowOk,
    DataSlowOk,
    MsgReject,
    DataReject,
    MsgFail,
    DataFail,
    Illegal,
    InconsistentStart,
    InconsistentOk,
    InconsistentReject,
    InconsistentFail,
    InconsistentIncrement,
    InconsistentProgress,
    InconsistentClose,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::MsgStart => "MSG_START",
            Marker::DataStart => "DATA_START",
            Marker::MsgProgress => "MSG_PROGRESS",
            Marker::DataProgress => "DATA_PROGRESS",
            Marker::DataSlowProgress => "DATA_SLOW_PROGRESS",
            Marker::MsgOk => "MSG_OK",
            Marker::DataOk => "DATA_OK",
            Marker::MsgSlowOk => "MSG_SLOW_OK",
            Marker::DataSlowOk => "DATA_SLOW_OK",
            Marker::MsgReject => "MSG_REJECT",
            Marker::DataReject => "DATA_REJECT",
            Marker::MsgFail => "MSG_FAIL",
            Marker::DataFail => "DATA_FAIL",
            Marker::Illegal => "ILLEGAL",
            Marker::InconsistentStart => "INCONSISTENT_START",
            Marker::InconsistentOk => "INCONSISTENT_OK",
            Marker::InconsistentReject => "INCONSISTENT_REJECT",
            Marker::InconsistentFail => "INCONSISTENT_FAIL",
            Marker::InconsistentIncrement => "INCONSISTENT_INCREMENT",
            Marker::InconsistentProgress => "INCONSISTENT_PROGRESS",
            Marker::InconsistentClose => "INCONSISTENT_CLOSE",
        }
    }

    /// True for the `DATA_*` markers carrying a serialized record envelope.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Marker::DataStart
                | Marker::DataProgress
                | Marker::DataSlowProgress
                | Marker::DataOk
                | Marker::DataSlowOk
                | Marker::DataReject
                | Marker::DataFail
        )
    }

    /// True for the misuse diagnostics (`ILLEGAL` and `INCONSISTENT_*`).
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Marker::Illegal
                | Marker::InconsistentStart
                | Marker::InconsistentOk
                | Marker::InconsistentReject
                | Marker::InconsistentFail
                | Marker::InconsistentIncrement
                | Marker::InconsistentProgress
                | Marker::InconsistentClose
        )
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for emitted log events.
///
/// Implementations own their concurrency and I/O. The meter treats `log` as
/// instantaneous and never inspects the outcome; a sink that fails must fail
/// on its own terms.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, marker: Marker, text: &str);

    /// Cheap short-circuit probe; sinks that drop a level can report it here
    /// so envelope construction is skipped.
    fn is_enabled(&self, _level: Level) -> bool {
        true
    }
}

/// One captured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: Level,
    pub marker: Marker,
    pub text: String,
}

/// Collecting logger holding events in memory.
///
/// Used by the test suites and useful for embedding: cheap, thread-safe,
/// inspectable.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    threshold: Mutex<Level>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collecting logger that reports levels below `threshold` as disabled.
    pub fn with_threshold(threshold: Level) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            threshold: Mutex::new(threshold),
        }
    }

    /// Snapshot of all captured events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Markers of all captured events, in emission order.
    pub fn markers(&self) -> Vec<Marker> {
        self.events.lock().iter().map(|e| e.marker).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, marker: Marker, text: &str) {
        self.events.lock().push(LogEvent {
            level,
            marker,
            text: text.to_string(),
        });
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= *self.threshold.lock()
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
