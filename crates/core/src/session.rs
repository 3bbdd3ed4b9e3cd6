// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity for one process run.
//!
//! Every meter is stamped with the session UUID and a monotonic position,
//! which together make its full id unique across emissions from concurrent
//! processes feeding the same collector.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

static UUID: RwLock<Option<String>> = RwLock::new(None);
static POSITION: AtomicU64 = AtomicU64::new(0);

/// The session UUID, generated lazily on first use.
pub fn uuid() -> String {
    if let Some(uuid) = UUID.read().as_ref() {
        return uuid.clone();
    }
    let mut guard = UUID.write();
    if let Some(uuid) = guard.as_ref() {
        return uuid.clone();
    }
    let fresh = uuid::Uuid::new_v4().to_string();
    *guard = Some(fresh.clone());
    fresh
}

/// Override the session UUID. Used by hosts that carry their own session
/// identity, and by tests.
pub fn set_uuid(uuid: impl Into<String>) {
    *UUID.write() = Some(uuid.into());
}

/// Next position within the session; the first meter gets 1.
pub fn next_position() -> u64 {
    POSITION.fetch_add(1, Ordering::SeqCst) + 1
}

/// Drop the UUID and rewind the position counter. Test hook.
pub fn reset() {
    *UUID.write() = None;
    POSITION.store(0, Ordering::SeqCst);
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
