// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide meter configuration.
//!
//! Read-mostly: every emission reads a snapshot, writes happen at startup or
//! from tests. Tests that mutate the record must serialize themselves.

use parking_lot::RwLock;

/// Default progress throttle: at most one progress emission per two seconds.
pub const DEFAULT_PROGRESS_PERIOD_MS: u64 = 2_000;

/// Process-wide tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterConfig {
    /// Minimum interval between progress emissions, in milliseconds.
    /// Zero disables throttling.
    pub progress_period_millis: u64,
    /// Text prepended to every serialized record envelope.
    pub data_prefix: String,
    /// Text appended to every serialized record envelope.
    pub data_suffix: String,
    /// When true, an attached probe fills the telemetry fields at each
    /// emission.
    pub system_status: bool,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            progress_period_millis: DEFAULT_PROGRESS_PERIOD_MS,
            data_prefix: String::new(),
            data_suffix: String::new(),
            system_status: false,
        }
    }
}

impl MeterConfig {
    /// Configuration with environment overrides applied on top of defaults:
    /// `OM_PROGRESS_PERIOD_MS`, `OM_DATA_PREFIX`, `OM_DATA_SUFFIX`,
    /// `OM_SYSTEM_STATUS` (`1`/`true`).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = std::env::var("OM_PROGRESS_PERIOD_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.progress_period_millis = ms;
        }
        if let Ok(prefix) = std::env::var("OM_DATA_PREFIX") {
            config.data_prefix = prefix;
        }
        if let Ok(suffix) = std::env::var("OM_DATA_SUFFIX") {
            config.data_suffix = suffix;
        }
        if let Ok(flag) = std::env::var("OM_SYSTEM_STATUS") {
            config.system_status = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        config
    }
}

static CONFIG: RwLock<MeterConfig> = RwLock::new(MeterConfig {
    progress_period_millis: DEFAULT_PROGRESS_PERIOD_MS,
    data_prefix: String::new(),
    data_suffix: String::new(),
    system_status: false,
});

/// Snapshot of the current configuration.
pub fn get() -> MeterConfig {
    CONFIG.read().clone()
}

/// Replace the configuration.
pub fn set(config: MeterConfig) {
    *CONFIG.write() = config;
}

/// Restore defaults. Test hook.
pub fn reset() {
    set(MeterConfig::default());
}

/// Load environment overrides into the process-wide record.
pub fn init_from_env() {
    set(MeterConfig::from_env());
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
