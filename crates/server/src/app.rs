// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router assembly: wires every §6 route onto [`AppState`], with request
//! tracing and a body-size ceiling carried as ambient stack regardless of
//! the out-of-scope rate-limiting/auth-session surfaces named in §1.

use crate::routes::{cascade, goals, locks, orchestrator, sessions, webhook};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Caps inbound bodies at 4 MiB — generous for a commit diff or a batch of
/// repair jobs, tight enough to bound memory under a misbehaving webhook sender.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/vcs", post(webhook::handle))
        .route("/cascade/analyze", post(cascade::analyze))
        .route("/orchestrator/batch", post(orchestrator::batch))
        .route("/orchestrator/sync", post(orchestrator::sync))
        .route("/orchestrator/sync-batch", post(orchestrator::sync_batch))
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goals/:id",
            get(goals::get_goal).patch(goals::update_goal).delete(goals::delete_goal),
        )
        .route("/goals/:id/re-audit", post(goals::re_audit_goal))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/:id/terminate", post(sessions::terminate_session))
        .route("/locks", get(locks::list_locks).delete(locks::purge_locks))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
