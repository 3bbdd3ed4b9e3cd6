// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome cause values.
//!
//! The path/reject/fail operations all accept a [`Cause`]: either a short
//! discriminator code stored verbatim, or a captured error. A captured error
//! contributes its simple type name as the ok/reject discriminator, and its
//! fully-qualified type name plus message on failure.

use std::fmt;

/// Argument to the outcome operations of a meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// A discriminator code, stored verbatim.
    Code(String),
    /// A captured error value.
    Error {
        /// Simple type name, e.g. `ParseIntError`.
        class: String,
        /// Fully-qualified type name, e.g. `core::num::ParseIntError`.
        full_class: String,
        /// The error's message, if it rendered to a non-empty string.
        message: Option<String>,
    },
}

impl Cause {
    /// Capture an error value.
    pub fn of<E: std::error::Error>(err: &E) -> Self {
        let full_class = std::any::type_name::<E>();
        let base = full_class.split('<').next().unwrap_or(full_class);
        let class = base.rsplit("::").next().unwrap_or(base);
        let rendered = err.to_string();
        Cause::Error {
            class: class.to_string(),
            full_class: full_class.to_string(),
            message: if rendered.is_empty() {
                None
            } else {
                Some(rendered)
            },
        }
    }

    /// Discriminator stored for path, ok, and reject outcomes.
    pub fn path_value(&self) -> &str {
        match self {
            Cause::Code(code) => code,
            Cause::Error { class, .. } => class,
        }
    }

    /// Discriminator stored for fail outcomes.
    pub fn fail_value(&self) -> &str {
        match self {
            Cause::Code(code) => code,
            Cause::Error { full_class, .. } => full_class,
        }
    }

    /// Message stored alongside a fail outcome.
    pub fn message(&self) -> Option<&str> {
        match self {
            Cause::Code(_) => None,
            Cause::Error { message, .. } => message.as_deref(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_value())
    }
}

impl From<&str> for Cause {
    fn from(code: &str) -> Self {
        Cause::Code(code.to_string())
    }
}

impl From<String> for Cause {
    fn from(code: String) -> Self {
        Cause::Code(code)
    }
}

impl From<&String> for Cause {
    fn from(code: &String) -> Self {
        Cause::Code(code.clone())
    }
}

#[cfg(test)]
#[path = "cause_tests.rs"]
mod tests;
