//! Wire-format scenarios: the compact record round trip and the DATA_*
//! envelope consumed by collectors.

use crate::prelude::meter;
use om_core::{Marker, MeterData};
use serial_test::serial;
use std::time::Duration;

#[test]
fn populated_record_round_trips() {
    let mut original = MeterData {
        session_uuid: "uuid-full".to_string(),
        position: 1,
        last_current_time: 1000,
        category: "processing".to_string(),
        operation: "batch_job".to_string(),
        parent: "parent-op".to_string(),
        description: "Batch job execution".to_string(),
        start_time: 2000,
        stop_time: 3000,
        ok_path: Some("success".to_string()),
        ..MeterData::default()
    };
    original
        .context
        .insert("key1".to_string(), "value1".to_string());

    let mut parsed = MeterData::default();
    parsed
        .read_json5(&format!("{{{}}}", original.to_json5()))
        .unwrap();

    assert_eq!(parsed.session_uuid, original.session_uuid);
    assert_eq!(parsed.position, original.position);
    assert_eq!(parsed.last_current_time, original.last_current_time);
    assert_eq!(parsed.category, original.category);
    assert_eq!(parsed.operation, original.operation);
    assert_eq!(parsed.parent, original.parent);
    assert_eq!(parsed.description, original.description);
    assert_eq!(parsed.start_time, original.start_time);
    assert_eq!(parsed.stop_time, original.stop_time);
    assert_eq!(parsed.ok_path, original.ok_path);
    assert_eq!(parsed.context, original.context);
    assert_eq!(parsed, original);
}

#[test]
fn empty_object_preserves_a_populated_record() {
    let mut data = MeterData {
        category: "processing".to_string(),
        current_iteration: 9,
        ..MeterData::default()
    };
    let before = data.clone();
    data.read_json5("{}").unwrap();
    assert_eq!(data, before);
}

#[test]
#[serial]
fn emitted_envelope_is_parseable_by_a_collector() {
    om_core::session::reset();
    om_core::session::set_uuid("uuid-full");

    let (m, logger, clock) = meter("processing");
    let mut m = m.with_operation("batch_job");
    m.m("Batch job execution").ctx("key1", "value1");
    m.start();
    clock.advance(Duration::from_millis(7));
    m.ok_with("success");

    let data_ok = logger
        .events()
        .into_iter()
        .find(|e| e.marker == Marker::DataOk)
        .unwrap();

    let mut collected = MeterData::default();
    collected.read_json5(&data_ok.text).unwrap();

    assert_eq!(collected.session_uuid, "uuid-full");
    assert!(collected.position > 0);
    assert_eq!(collected.category, "processing");
    assert_eq!(collected.operation, "batch_job");
    assert_eq!(collected.description, "Batch job execution");
    assert_eq!(collected.ok_path.as_deref(), Some("success"));
    assert_eq!(
        collected.context.get("key1").map(String::as_str),
        Some("value1")
    );
    assert_eq!(collected.stop_time - collected.start_time, 7_000_000);
    assert!(collected.is_ok());

    om_core::session::reset();
}
