// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Level, LogEvent, Logger, Marker, MemoryLogger};

#[test]
fn level_ordering() {
    assert!(Level::Trace < Level::Debug);
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
}

#[yare::parameterized(
    msg_start          = { Marker::MsgStart, "MSG_START" },
    data_start         = { Marker::DataStart, "DATA_START" },
    msg_slow_ok        = { Marker::MsgSlowOk, "MSG_SLOW_OK" },
    data_slow_progress = { Marker::DataSlowProgress, "DATA_SLOW_PROGRESS" },
    illegal            = { Marker::Illegal, "ILLEGAL" },
    inconsistent_close = { Marker::InconsistentClose, "INCONSISTENT_CLOSE" },
)]
fn marker_wire_names(marker: Marker, expected: &str) {
    assert_eq!(marker.to_string(), expected);
}

#[test]
fn marker_serde_matches_wire_names() {
    let json = serde_json::to_string(&Marker::DataSlowOk).unwrap();
    assert_eq!(json, "\"DATA_SLOW_OK\"");
    let parsed: Marker = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, Marker::DataSlowOk);
}

#[test]
fn marker_classification() {
    assert!(Marker::DataOk.is_data());
    assert!(!Marker::MsgOk.is_data());
    assert!(Marker::Illegal.is_diagnostic());
    assert!(Marker::InconsistentIncrement.is_diagnostic());
    assert!(!Marker::DataProgress.is_diagnostic());
}

#[test]
fn memory_logger_captures_in_order() {
    let logger = MemoryLogger::new();
    logger.log(Level::Debug, Marker::MsgStart, "started");
    logger.log(Level::Trace, Marker::DataStart, "{}");

    assert_eq!(logger.len(), 2);
    assert_eq!(logger.markers(), vec![Marker::MsgStart, Marker::DataStart]);
    assert_eq!(
        logger.events()[0],
        LogEvent {
            level: Level::Debug,
            marker: Marker::MsgStart,
            text: "started".to_string(),
        }
    );
}

#[test]
fn memory_logger_threshold_disables_lower_levels() {
    let logger = MemoryLogger::with_threshold(Level::Info);
    assert!(!logger.is_enabled(Level::Trace));
    assert!(logger.is_enabled(Level::Info));
    assert!(logger.is_enabled(Level::Error));
}

#[test]
fn memory_logger_clear() {
    let logger = MemoryLogger::new();
    logger.log(Level::Info, Marker::MsgOk, "ok");
    logger.clear();
    assert!(logger.is_empty());
}
