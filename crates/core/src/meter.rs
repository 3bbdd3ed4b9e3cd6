// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The meter state machine.
//!
//! A meter tracks one instrumented operation: created, optionally
//! configured, started, optionally progressing, and terminated as ok,
//! rejected, or failed. Transitions emit event pairs through the injected
//! logger; invalid calls emit a diagnostic instead. No meter operation ever
//! panics or returns an error, so instrumentation cannot break the host
//! program.
//!
//! Misuse handling has three shapes: setters called out of order emit
//! `ILLEGAL` and change nothing; lifecycle calls out of order emit an
//! `INCONSISTENT_*` diagnostic and change nothing; and a termination on a
//! never-started meter (or `close` on an abandoned one) emits the
//! diagnostic but still completes, so the record always ends in a terminal
//! state.

use std::fmt;
use std::sync::Arc;

use crate::cause::Cause;
use crate::clock::{Clock, SystemClock};
use crate::config;
use crate::current;
use crate::data::MeterData;
use crate::emit;
use crate::logger::{Level, Logger, Marker};
use crate::probe::SystemProbe;
use crate::session;

/// Stored in place of a missing context value.
pub const NULL_VALUE: &str = "<null>";

/// Failure path recorded when a meter is dropped or closed without an
/// explicit termination.
pub const DROPPED_PATH: &str = "dropped";

/// One instrumented operation instance.
pub struct Meter {
    data: MeterData,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
    probe: Option<Arc<dyn SystemProbe>>,
    last_progress_time: u64,
    last_progress_iteration: u64,
}

enum Outcome {
    Ok(Option<Cause>),
    Reject(Cause),
    Fail(Cause),
}

impl Outcome {
    fn word(&self) -> &'static str {
        match self {
            Outcome::Ok(_) => "ok",
            Outcome::Reject(_) => "reject",
            Outcome::Fail(_) => "fail",
        }
    }

    fn inconsistent_marker(&self) -> Marker {
        match self {
            Outcome::Ok(_) => Marker::InconsistentOk,
            Outcome::Reject(_) => Marker::InconsistentReject,
            Outcome::Fail(_) => Marker::InconsistentFail,
        }
    }
}

impl Meter {
    /// Meter on the production clock.
    ///
    /// The session UUID and the next session position are stamped at
    /// creation, and the innermost running meter on this thread, if any,
    /// is captured as the parent.
    pub fn new(logger: Arc<dyn Logger>, category: impl Into<String>) -> Self {
        Self::with_clock(logger, Arc::new(SystemClock), category)
    }

    /// Meter on an injected clock.
    pub fn with_clock(
        logger: Arc<dyn Logger>,
        clock: Arc<dyn Clock>,
        category: impl Into<String>,
    ) -> Self {
        let create_time = clock.now_nanos();
        let data = MeterData {
            session_uuid: session::uuid(),
            position: session::next_position(),
            category: category.into(),
            parent: current::current_full_id().unwrap_or_default(),
            create_time,
            last_current_time: create_time,
            ..MeterData::default()
        };
        Self {
            data,
            logger,
            clock,
            probe: None,
            last_progress_time: 0,
            last_progress_iteration: 0,
        }
    }

    /// Set the operation name within the category.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.data.operation = operation.into();
        self
    }

    /// Reestablish the parent link explicitly, e.g. across threads.
    pub fn with_parent(mut self, full_id: impl Into<String>) -> Self {
        self.data.parent = full_id.into();
        self
    }

    /// Attach a telemetry probe, consulted at emissions when telemetry
    /// collection is enabled in the configuration.
    pub fn with_probe(mut self, probe: Arc<dyn SystemProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Child meter: same logger, clock, and category; this meter is the
    /// parent.
    pub fn sub(&self, operation: impl Into<String>) -> Meter {
        Self::with_clock(
            Arc::clone(&self.logger),
            Arc::clone(&self.clock),
            self.data.category.clone(),
        )
        .with_operation(operation)
        .with_parent(self.data.full_id())
    }

    /// The record this meter owns.
    pub fn data(&self) -> &MeterData {
        &self.data
    }

    /// `category/operation#position` identity of this meter.
    pub fn full_id(&self) -> String {
        self.data.full_id()
    }

    // ── Configuration setters ───────────────────────────────────────────────

    /// Set the human-readable description. Callers format upfront:
    /// `meter.m(format!("rebuilding {} shards", n))`.
    pub fn m(&mut self, message: impl Into<String>) -> &mut Self {
        if self.refuse_if_stopped("m") {
            return self;
        }
        self.data.description = message.into();
        self
    }

    /// Add a context entry. Re-inserting a key keeps its original position.
    pub fn ctx(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        if self.refuse_if_stopped("ctx") {
            return self;
        }
        self.data.context.insert(key.into(), value.into());
        self
    }

    /// Add a context entry from an optional value; `None` is recorded as
    /// the literal `<null>`.
    pub fn ctx_opt<V: fmt::Display>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if self.refuse_if_stopped("ctx") {
            return self;
        }
        let rendered = match value {
            Some(v) => v.to_string(),
            None => NULL_VALUE.to_string(),
        };
        self.data.context.insert(key.into(), rendered);
        self
    }

    /// Add a value-less context flag.
    pub fn ctx_flag(&mut self, key: impl Into<String>) -> &mut Self {
        if self.refuse_if_stopped("ctx") {
            return self;
        }
        self.data.context.insert(key.into(), String::new());
        self
    }

    /// Remove a context entry.
    pub fn unctx(&mut self, key: &str) -> &mut Self {
        if self.refuse_if_stopped("unctx") {
            return self;
        }
        self.data.context.shift_remove(key);
        self
    }

    /// Declare the expected number of iterations. Advisory, not a cap.
    pub fn iterations(&mut self, expected: u64) -> &mut Self {
        if self.refuse_if_stopped("iterations") {
            return self;
        }
        if expected == 0 {
            self.illegal(format!(
                "iterations requires at least 1: {}",
                self.data.full_id()
            ));
            return self;
        }
        self.data.expected_iterations = expected;
        self
    }

    /// Declare the duration beyond which this run counts as slow.
    pub fn limit_millis(&mut self, millis: u64) -> &mut Self {
        if self.refuse_if_stopped("limit_millis") {
            return self;
        }
        if millis == 0 {
            self.illegal(format!(
                "limit_millis requires at least 1: {}",
                self.data.full_id()
            ));
            return self;
        }
        self.data.time_limit = millis.saturating_mul(1_000_000);
        self
    }

    /// Tentatively record the success discriminator. Legal only while
    /// running; the terminating call's own argument, when present, wins.
    pub fn path(&mut self, value: impl Into<Cause>) -> &mut Self {
        if !self.data.is_started() || self.data.is_stopped() {
            self.illegal(format!(
                "path requires a running meter: {}",
                self.data.full_id()
            ));
            return self;
        }
        self.data.ok_path = Some(value.into().path_value().to_string());
        self
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Start the meter and emit the start pair.
    ///
    /// A second start, before or after termination, emits
    /// `INCONSISTENT_START` and mutates nothing.
    pub fn start(&mut self) -> &mut Self {
        if self.data.is_started() || self.data.is_stopped() {
            let state = if self.data.is_stopped() {
                "already stopped"
            } else {
                "already started"
            };
            self.diag(
                Marker::InconsistentStart,
                format!("start ignored: {} {}", self.data.full_id(), state),
            );
            return self;
        }
        let now = self.clock.now_nanos();
        let config = config::get();
        self.data.start_time = now;
        self.data.last_current_time = now;
        self.last_progress_time = now;
        self.last_progress_iteration = self.data.current_iteration;
        self.snapshot(&config);
        current::push(self.data.full_id());
        emit::emit_pair(
            self.logger.as_ref(),
            Marker::MsgStart,
            Marker::DataStart,
            &self.data,
            &config,
            0,
        );
        self
    }

    /// Terminate as an anonymous success, keeping any tentative path.
    pub fn ok(&mut self) -> &mut Self {
        self.terminate(Outcome::Ok(None), false);
        self
    }

    /// Terminate as a success on the given path.
    pub fn ok_with(&mut self, path: impl Into<Cause>) -> &mut Self {
        self.terminate(Outcome::Ok(Some(path.into())), false);
        self
    }

    /// Terminate as a rejection: an anticipated refusal, not a malfunction.
    pub fn reject(&mut self, cause: impl Into<Cause>) -> &mut Self {
        self.terminate(Outcome::Reject(cause.into()), false);
        self
    }

    /// Terminate as a failure.
    pub fn fail(&mut self, cause: impl Into<Cause>) -> &mut Self {
        self.terminate(Outcome::Fail(cause.into()), false);
        self
    }

    /// Safety net for scoped use: terminate an unterminated meter as a
    /// failure on [`DROPPED_PATH`]. Invoked by `Drop`; idempotent.
    pub fn close(&mut self) -> &mut Self {
        if self.data.is_stopped() {
            return self;
        }
        if !self.data.is_started() {
            self.diag(
                Marker::InconsistentClose,
                format!("close before start: {}", self.data.full_id()),
            );
        }
        self.terminate(Outcome::Fail(Cause::from(DROPPED_PATH)), true);
        self
    }

    // ── Progress ────────────────────────────────────────────────────────────

    /// Advance the iteration counter by one.
    pub fn inc(&mut self) -> &mut Self {
        if self.refuse_unless_running("inc") {
            return self;
        }
        self.data.current_iteration += 1;
        self
    }

    /// Advance the iteration counter by a positive step.
    pub fn inc_by(&mut self, step: u64) -> &mut Self {
        if self.refuse_unless_running("inc_by") {
            return self;
        }
        if step == 0 {
            self.illegal(format!(
                "inc_by requires a positive step: {}",
                self.data.full_id()
            ));
            return self;
        }
        self.data.current_iteration = self.data.current_iteration.saturating_add(step);
        self
    }

    /// Move the iteration counter forward to an absolute value.
    pub fn inc_to(&mut self, iteration: u64) -> &mut Self {
        if self.refuse_unless_running("inc_to") {
            return self;
        }
        if iteration <= self.data.current_iteration {
            self.illegal(format!(
                "inc_to requires a forward target: {}",
                self.data.full_id()
            ));
            return self;
        }
        self.data.current_iteration = iteration;
        self
    }

    /// Emit a progress pair if the iteration counter advanced since the
    /// previous emission and the configured progress period elapsed.
    ///
    /// Cheap to call on every loop iteration.
    pub fn progress(&mut self) -> &mut Self {
        if !self.data.is_started() || self.data.is_stopped() {
            self.diag(
                Marker::InconsistentProgress,
                format!(
                    "progress outside a running meter: {}",
                    self.data.full_id()
                ),
            );
            return self;
        }
        if self.data.current_iteration <= self.last_progress_iteration {
            return self;
        }
        let now = self.clock.now_nanos();
        let config = config::get();
        let period_ns = config.progress_period_millis.saturating_mul(1_000_000);
        if period_ns > 0 && now.saturating_sub(self.last_progress_time) < period_ns {
            return self;
        }
        self.data.last_current_time = now;
        self.snapshot(&config);
        let elapsed = now.saturating_sub(self.data.start_time);
        let slow = self.data.time_limit > 0 && elapsed > self.data.time_limit;
        let data_marker = if slow {
            Marker::DataSlowProgress
        } else {
            Marker::DataProgress
        };
        emit::emit_pair(
            self.logger.as_ref(),
            Marker::MsgProgress,
            data_marker,
            &self.data,
            &config,
            elapsed,
        );
        self.last_progress_time = now;
        self.last_progress_iteration = self.data.current_iteration;
        self
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn terminate(&mut self, outcome: Outcome, from_close: bool) {
        if self.data.is_stopped() {
            // First termination wins; only the diagnostic is emitted.
            self.diag(
                outcome.inconsistent_marker(),
                format!(
                    "{} ignored: {} already stopped",
                    outcome.word(),
                    self.data.full_id()
                ),
            );
            return;
        }
        let was_started = self.data.is_started();
        if !was_started && !from_close {
            self.diag(
                outcome.inconsistent_marker(),
                format!("{} before start: {}", outcome.word(), self.data.full_id()),
            );
        }
        let now = self.clock.now_nanos();
        let config = config::get();
        self.data.stop_time = now;
        self.data.last_current_time = now;
        match &outcome {
            Outcome::Ok(None) => {}
            Outcome::Ok(Some(cause)) => {
                self.data.ok_path = Some(cause.path_value().to_string());
            }
            Outcome::Reject(cause) => {
                self.data.ok_path = None;
                self.data.reject_path = Some(cause.path_value().to_string());
            }
            Outcome::Fail(cause) => {
                self.data.ok_path = None;
                self.data.fail_path = Some(cause.fail_value().to_string());
                self.data.fail_message = cause.message().map(str::to_string);
            }
        }
        self.snapshot(&config);
        let base = if was_started {
            self.data.start_time
        } else {
            self.data.create_time
        };
        let elapsed = now.saturating_sub(base);
        let slow = self.data.time_limit > 0 && elapsed > self.data.time_limit;
        let (msg_marker, data_marker) = match (&outcome, slow) {
            (Outcome::Ok(_), false) => (Marker::MsgOk, Marker::DataOk),
            (Outcome::Ok(_), true) => (Marker::MsgSlowOk, Marker::DataSlowOk),
            (Outcome::Reject(_), _) => (Marker::MsgReject, Marker::DataReject),
            (Outcome::Fail(_), _) => (Marker::MsgFail, Marker::DataFail),
        };
        emit::emit_pair(
            self.logger.as_ref(),
            msg_marker,
            data_marker,
            &self.data,
            &config,
            elapsed,
        );
        // The context is consumed by the terminal emission.
        self.data.context.clear();
        if was_started {
            current::remove(&self.data.full_id());
        }
    }

    fn snapshot(&mut self, config: &config::MeterConfig) {
        if config.system_status {
            if let Some(probe) = &self.probe {
                probe.snapshot(&mut self.data);
            }
        }
    }

    fn diag(&self, marker: Marker, text: String) {
        self.logger.log(Level::Error, marker, &text);
    }

    fn illegal(&self, text: String) {
        self.diag(Marker::Illegal, text);
    }

    fn refuse_if_stopped(&self, op: &str) -> bool {
        if self.data.is_stopped() {
            self.illegal(format!("{} on a stopped meter: {}", op, self.data.full_id()));
            return true;
        }
        false
    }

    fn refuse_unless_running(&self, op: &str) -> bool {
        if !self.data.is_started() || self.data.is_stopped() {
            self.diag(
                Marker::InconsistentIncrement,
                format!("{} outside a running meter: {}", op, self.data.full_id()),
            );
            return true;
        }
        false
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meter").field("data", &self.data).finish()
    }
}

impl Drop for Meter {
    fn drop(&mut self) {
        if !self.data.is_stopped() {
            self.close();
        }
    }
}

#[cfg(test)]
#[path = "meter_tests.rs"]
mod tests;
