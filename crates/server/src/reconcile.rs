// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional reconciliation timer (§9 design note: the core has no
//! background workers by default). When enabled, periodically polls the
//! Agent Provider for every non-terminal session so a missed webhook
//! delivery can't leave a session stuck in *executing* forever — the same
//! role the teacher's `reconcile_state` sweep plays for orphaned jobs at
//! startup, run here on a recurring timer instead of once at boot.

use crate::state::ProdEngine;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub fn spawn(engine: Arc<ProdEngine>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let sessions = engine.registry().list_active_sessions();
            debug!(count = sessions.len(), "reconciliation sweep starting");
            for session in sessions {
                if let Err(e) = engine.sync(&session.id).await {
                    warn!(session_id = %session.id, error = %e, "reconciliation sync failed");
                }
            }
        }
    });
}
