// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time source abstraction so entity and engine logic never reads the
//! system clock directly. Production wiring uses [`SystemClock`]; tests
//! use [`FakeClock`] to get deterministic, controllable timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// A clock with a settable value, advanced explicitly by tests instead of
/// by sleeping. Starts at `2024-01-01T00:00:00Z`.
#[derive(Debug)]
pub struct FakeClock {
    now_ms: AtomicI64,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_704_067_200_000)
    }
}

impl FakeClock {
    pub fn new(epoch_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(epoch_ms),
        }
    }

    pub fn advance_ms(&self, delta: i64) {
        self.now_ms.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_ms(&self, epoch_ms: i64) {
        self.now_ms.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
