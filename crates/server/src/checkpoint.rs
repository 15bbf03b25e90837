// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic snapshotting. Unlike the teacher's daemon, which clones state
//! and serializes on a blocking thread itself, the durability ordering
//! (temp file, fsync, atomic rename, WAL truncate) already lives inside
//! [`relay_storage::Registry::checkpoint`] — this task is just the timer.

use relay_storage::Registry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub fn spawn(registry: Arc<Registry>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match registry.checkpoint() {
                Ok(()) => debug!("checkpoint complete"),
                Err(e) => warn!(error = %e, "checkpoint failed"),
            }
        }
    });
}
