// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emission layer: level selection, human-readable line rendering, and the
//! DATA_* envelope.
//!
//! Every lifecycle transition produces a pair of events: the MSG_* line for
//! humans and, when trace is enabled on the sink, the DATA_* envelope
//! carrying the serialized record for collectors.

use crate::config::MeterConfig;
use crate::data::MeterData;
use crate::logger::{Level, Logger, Marker};
use crate::time_fmt::{format_duration_ns, format_rate};

/// Level of the human-readable line for a message marker.
pub fn message_level(marker: Marker) -> Level {
    match marker {
        Marker::MsgStart => Level::Debug,
        Marker::MsgProgress | Marker::MsgOk | Marker::MsgReject => Level::Info,
        Marker::MsgSlowOk => Level::Warn,
        _ => Level::Error,
    }
}

/// The text payload of a DATA_* event:
/// `prefix + "{" + compact record + "}" + suffix`.
pub fn envelope(data: &MeterData, config: &MeterConfig) -> String {
    let mut out = String::with_capacity(128);
    out.push_str(&config.data_prefix);
    out.push('{');
    data.write_json5(&mut out);
    out.push('}');
    out.push_str(&config.data_suffix);
    out
}

/// Human-readable line for a MSG_* marker.
///
/// Segments joined by `"; "`: marker word and full id, description,
/// iteration count, elapsed duration, throughput, outcome, context.
pub fn render_message(marker: Marker, data: &MeterData, elapsed_ns: u64) -> String {
    let word = match marker {
        Marker::MsgStart => "started",
        Marker::MsgProgress => "progress",
        Marker::MsgOk => "ok",
        Marker::MsgSlowOk => "slow ok",
        Marker::MsgReject => "rejected",
        Marker::MsgFail => "failed",
        _ => "event",
    };
    let mut parts = vec![format!("{}: {}", word, data.full_id())];

    if !data.description.is_empty() {
        parts.push(data.description.clone());
    }

    if data.expected_iterations > 0 {
        parts.push(format!(
            "{}/{}",
            data.current_iteration, data.expected_iterations
        ));
    } else if data.current_iteration > 0 {
        parts.push(data.current_iteration.to_string());
    }

    if marker != Marker::MsgStart {
        parts.push(format_duration_ns(elapsed_ns));
    }

    if marker == Marker::MsgProgress {
        let rate = format_rate(data.current_iteration, elapsed_ns);
        if !rate.is_empty() {
            parts.push(rate);
        }
    }

    let outcome = match marker {
        Marker::MsgOk | Marker::MsgSlowOk => data.ok_path.as_deref(),
        Marker::MsgReject => data.reject_path.as_deref(),
        Marker::MsgFail => data.fail_path.as_deref(),
        _ => None,
    };
    if let Some(path) = outcome {
        match data.fail_message.as_deref().filter(|_| marker == Marker::MsgFail) {
            Some(message) => parts.push(format!("-> {} ({})", path, message)),
            None => parts.push(format!("-> {}", path)),
        }
    }

    if !data.context.is_empty() {
        let entries = data
            .context
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("[{}]", entries));
    }

    parts.join("; ")
}

/// Emit the MSG_*/DATA_* pair for a transition, in that order.
pub(crate) fn emit_pair(
    logger: &dyn Logger,
    msg_marker: Marker,
    data_marker: Marker,
    data: &MeterData,
    config: &MeterConfig,
    elapsed_ns: u64,
) {
    logger.log(
        message_level(msg_marker),
        msg_marker,
        &render_message(msg_marker, data, elapsed_ns),
    );
    if logger.is_enabled(Level::Trace) {
        logger.log(Level::Trace, data_marker, &envelope(data, config));
    }
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
