// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! om-core: Core library for the OpMeter operation instrumentation toolkit

pub mod cause;
pub mod clock;
pub mod codec;
pub mod config;
pub mod current;
pub mod data;
pub mod emit;
pub mod logger;
pub mod meter;
pub mod probe;
pub mod session;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cause::Cause;
pub use clock::{Clock, FakeClock, SystemClock};
pub use codec::CodecError;
pub use config::MeterConfig;
pub use current::{current_full_id, current_or_unknown, UNKNOWN_ID};
pub use data::MeterData;
pub use logger::{Level, LogEvent, Logger, Marker, MemoryLogger};
pub use meter::{Meter, DROPPED_PATH, NULL_VALUE};
pub use probe::{NullProbe, SystemProbe};
pub use time_fmt::{format_duration_ns, format_rate};
