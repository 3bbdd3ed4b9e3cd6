// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serializable record a meter owns.
//!
//! `MeterData` is an open record: all fields are directly readable and the
//! meter mutates them over its lifecycle. The compact wire form lives in the
//! codec module; the serde derives cover ordinary JSON interchange.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Event payload for one instrumented operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterData {
    // ── Identity ────────────────────────────────────────────────────────────
    /// UUID of the process session this record belongs to.
    #[serde(default)]
    pub session_uuid: String,
    /// Monotonic counter within the session; stamped at creation.
    #[serde(default)]
    pub position: u64,
    /// Operation family, typically the instrumented component's name.
    #[serde(default)]
    pub category: String,
    /// Operation name within the category; may be empty.
    #[serde(default)]
    pub operation: String,
    /// Full id of the parent meter, when nested.
    #[serde(default)]
    pub parent: String,
    /// Human-readable description supplied by the caller.
    #[serde(default)]
    pub description: String,

    // ── Timing (monotonic nanoseconds; durations in nanoseconds) ────────────
    #[serde(default)]
    pub create_time: u64,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub stop_time: u64,
    /// Reading taken at the most recent emission.
    #[serde(default)]
    pub last_current_time: u64,
    /// Duration after which a run counts as slow; zero disables.
    #[serde(default)]
    pub time_limit: u64,

    // ── Iterations ──────────────────────────────────────────────────────────
    #[serde(default)]
    pub current_iteration: u64,
    /// Advisory expected total; not a cap.
    #[serde(default)]
    pub expected_iterations: u64,

    // ── Outcome ─────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_message: Option<String>,

    // ── Context ─────────────────────────────────────────────────────────────
    /// Caller-supplied key/value pairs, emitted in insertion order.
    #[serde(default)]
    pub context: IndexMap<String, String>,

    // ── System telemetry (filled by a probe; zero when disabled) ────────────
    #[serde(default)]
    pub heap_committed: u64,
    #[serde(default)]
    pub heap_max: u64,
    #[serde(default)]
    pub heap_used: u64,
    #[serde(default)]
    pub non_heap_committed: u64,
    #[serde(default)]
    pub non_heap_max: u64,
    #[serde(default)]
    pub non_heap_used: u64,
    #[serde(default)]
    pub pending_finalization_count: u64,
    #[serde(default)]
    pub classes_loaded: u64,
    #[serde(default)]
    pub classes_total: u64,
    #[serde(default)]
    pub classes_unloaded: u64,
    #[serde(default)]
    pub compilation_time: u64,
    #[serde(default)]
    pub collector_count: u64,
    #[serde(default)]
    pub collector_time: u64,
    #[serde(default)]
    pub runtime_used_memory: u64,
    #[serde(default)]
    pub runtime_max_memory: u64,
    #[serde(default)]
    pub runtime_total_memory: u64,
    #[serde(default)]
    pub system_load: f64,
}

impl MeterData {
    /// `category/operation#position`, or `category#position` when the
    /// operation is unset.
    pub fn full_id(&self) -> String {
        if self.operation.is_empty() {
            format!("{}#{}", self.category, self.position)
        } else {
            format!("{}/{}#{}", self.category, self.operation, self.position)
        }
    }

    /// The outcome discriminator: first set of ok/reject/fail path.
    pub fn path(&self) -> Option<&str> {
        self.ok_path
            .as_deref()
            .or(self.reject_path.as_deref())
            .or(self.fail_path.as_deref())
    }

    pub fn is_started(&self) -> bool {
        self.start_time > 0
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_time > 0
    }

    /// Stopped without rejection or failure; an anonymous success has no
    /// path at all.
    pub fn is_ok(&self) -> bool {
        self.is_stopped() && self.reject_path.is_none() && self.fail_path.is_none()
    }

    pub fn is_reject(&self) -> bool {
        self.is_stopped() && self.reject_path.is_some()
    }

    pub fn is_fail(&self) -> bool {
        self.is_stopped() && self.fail_path.is_some()
    }

    /// Zero every field and drop the context entries.
    ///
    /// The context map stays observable (empty, never absent).
    pub fn reset(&mut self) {
        *self = MeterData::default();
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
