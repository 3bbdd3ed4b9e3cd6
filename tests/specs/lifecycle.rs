//! Lifecycle scenarios: start/terminate emission pairs, slow classification,
//! and misuse recovery.

use crate::prelude::meter;
use om_core::{Level, Marker};
use std::time::Duration;

#[test]
fn happy_path_emits_start_and_ok_pairs() {
    let (mut m, logger, clock) = meter("processing");
    m.start();
    clock.advance(Duration::from_millis(5));
    m.ok();

    let events = logger.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        (events[0].level, events[0].marker),
        (Level::Debug, Marker::MsgStart)
    );
    assert_eq!(
        (events[1].level, events[1].marker),
        (Level::Trace, Marker::DataStart)
    );
    assert_eq!(
        (events[2].level, events[2].marker),
        (Level::Info, Marker::MsgOk)
    );
    assert_eq!(
        (events[3].level, events[3].marker),
        (Level::Trace, Marker::DataOk)
    );

    let data = m.data();
    assert!(data.is_started());
    assert!(data.is_stopped());
    assert!(data.is_ok());
    assert_eq!(data.ok_path, None);
}

#[test]
fn run_over_the_limit_is_a_slow_ok() {
    let (mut m, logger, clock) = meter("processing");
    m.limit_millis(50);
    m.start();
    clock.advance(Duration::from_millis(100));
    m.ok();

    let events = logger.events();
    assert_eq!(
        (events[2].level, events[2].marker),
        (Level::Warn, Marker::MsgSlowOk)
    );
    assert_eq!(events[3].marker, Marker::DataSlowOk);
    assert!(m.data().is_ok());
}

#[test]
fn pre_start_path_is_rejected_then_reject_completes() {
    let (mut m, logger, _clock) = meter("processing");
    m.path("x");
    m.reject("err");

    let events = logger.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        (events[0].level, events[0].marker),
        (Level::Error, Marker::Illegal)
    );
    assert_eq!(
        (events[1].level, events[1].marker),
        (Level::Error, Marker::InconsistentReject)
    );
    assert_eq!(
        (events[2].level, events[2].marker),
        (Level::Info, Marker::MsgReject)
    );
    assert_eq!(
        (events[3].level, events[3].marker),
        (Level::Trace, Marker::DataReject)
    );

    let data = m.data();
    assert_eq!(data.reject_path.as_deref(), Some("err"));
    assert_eq!(data.ok_path, None);
}

#[test]
fn first_termination_wins() {
    let (mut m, logger, _clock) = meter("processing");
    m.start();
    m.ok_with("first");
    logger.clear();

    m.fail("second");

    assert_eq!(logger.markers(), vec![Marker::InconsistentFail]);
    let data = m.data();
    assert_eq!(data.ok_path.as_deref(), Some("first"));
    assert_eq!(data.fail_path, None);
    assert!(data.is_ok());
}

#[test]
fn restart_after_termination_is_refused() {
    let (mut m, logger, clock) = meter("processing");
    m.start();
    let started = m.data().start_time;
    m.ok();
    let stopped = m.data().stop_time;
    logger.clear();

    clock.advance(Duration::from_millis(1));
    m.start();

    assert_eq!(logger.markers(), vec![Marker::InconsistentStart]);
    assert_eq!(m.data().start_time, started);
    assert_eq!(m.data().stop_time, stopped);
}

#[test]
fn scoped_use_fails_an_abandoned_meter() {
    let (mut m, logger, _clock) = meter("processing");
    m.start();
    drop(m);

    assert_eq!(
        logger.markers(),
        vec![
            Marker::MsgStart,
            Marker::DataStart,
            Marker::MsgFail,
            Marker::DataFail,
        ]
    );
    assert!(logger.events()[2].text.contains("dropped"));
}

#[test]
fn scoped_use_of_a_never_started_meter_adds_a_close_diagnostic() {
    let (m, logger, _clock) = meter("processing");
    drop(m);

    assert_eq!(
        logger.markers(),
        vec![
            Marker::InconsistentClose,
            Marker::MsgFail,
            Marker::DataFail,
        ]
    );
}

#[test]
fn nested_meters_link_parent_and_child() {
    let (mut outer, logger, clock) = meter("web");
    outer.start();

    let mut inner = om_core::Meter::with_clock(
        logger.clone(),
        std::sync::Arc::new(clock.clone()),
        "db",
    );
    assert_eq!(inner.data().parent, outer.full_id());
    inner.start();
    inner.ok();
    outer.ok();

    assert_eq!(om_core::current_full_id(), None);
    assert_eq!(om_core::current_or_unknown(), om_core::UNKNOWN_ID);
}
