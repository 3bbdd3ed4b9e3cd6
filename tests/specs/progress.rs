//! Progress reporting scenarios: emission per advance, and time-based
//! throttling.
//!
//! These mutate the process-wide configuration, so they serialize.

use crate::prelude::meter;
use om_core::{Marker, MeterConfig};
use serial_test::serial;
use std::time::Duration;

fn run_fifteen_iterations(period_millis: u64) -> Vec<Marker> {
    om_core::config::set(MeterConfig {
        progress_period_millis: period_millis,
        ..MeterConfig::default()
    });

    let (mut m, logger, clock) = meter("processing");
    m.iterations(15);
    m.start();
    for _ in 0..5 {
        m.inc();
    }
    clock.advance(Duration::from_millis(40));
    m.progress();
    for _ in 0..5 {
        m.inc();
    }
    clock.advance(Duration::from_millis(40));
    m.progress();
    for _ in 0..5 {
        m.inc();
    }
    clock.advance(Duration::from_millis(40));
    m.ok();
    assert_eq!(m.data().current_iteration, 15);

    om_core::config::reset();
    logger.markers()
}

#[test]
#[serial]
fn unthrottled_progress_emits_every_checkpoint() {
    assert_eq!(
        run_fifteen_iterations(0),
        vec![
            Marker::MsgStart,
            Marker::DataStart,
            Marker::MsgProgress,
            Marker::DataProgress,
            Marker::MsgProgress,
            Marker::DataProgress,
            Marker::MsgOk,
            Marker::DataOk,
        ]
    );
}

#[test]
#[serial]
fn throttled_progress_suppresses_early_checkpoints() {
    // 40 ms into a 50 ms period: the first checkpoint is suppressed, the
    // second (80 ms after start) goes through.
    assert_eq!(
        run_fifteen_iterations(50),
        vec![
            Marker::MsgStart,
            Marker::DataStart,
            Marker::MsgProgress,
            Marker::DataProgress,
            Marker::MsgOk,
            Marker::DataOk,
        ]
    );
}

#[test]
#[serial]
fn slow_progress_is_flagged_in_the_data_marker() {
    om_core::config::set(MeterConfig {
        progress_period_millis: 0,
        ..MeterConfig::default()
    });

    let (mut m, logger, clock) = meter("processing");
    m.limit_millis(10);
    m.start();
    m.inc();
    clock.advance(Duration::from_millis(25));
    m.progress();
    m.ok();

    om_core::config::reset();

    let markers = logger.markers();
    assert!(markers.contains(&Marker::DataSlowProgress));
    assert!(!markers.contains(&Marker::DataProgress));
}
