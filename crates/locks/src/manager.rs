// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Lock Manager (component C2): the only component that mutates
//! `FileLock`. Every concurrent interaction in the system resolves to
//! acquire/transfer/release — no ad-hoc locking anywhere else. This is
//! also the only place a uniqueness violation is caught and converted to
//! a structured conflict, a pattern worth preserving verbatim wherever
//! this logic is reused.

use crate::error::LockError;
use relay_core::event::Event;
use relay_core::lock::dedupe_paths;
use relay_core::session::SessionId;
use relay_storage::{MaterializedState, Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConflict {
    pub path: String,
    pub held_by: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquireOutcome {
    Ok { locked: Vec<String> },
    Conflict { conflicts: Vec<LockConflict> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockStatus {
    pub path: String,
    pub session_id: SessionId,
    pub branch: String,
    pub status: relay_core::session::SessionStatus,
}

/// Decide the outcome of an `acquire` against a read-only view of state,
/// without touching storage. Pure so it can be unit-tested directly and
/// reused inside a larger transaction (e.g. cascade dispatch, which needs
/// to acquire locks for several jobs without racing itself).
///
/// All-or-nothing: either every requested path ends up held by
/// `session_id`, or none of them change and the caller gets back the
/// paths held by someone else.
pub fn plan_acquire(
    state: &MaterializedState,
    session_id: &SessionId,
    paths: &[String],
    now_ms: i64,
) -> Result<(AcquireOutcome, Vec<Event>), LockError> {
    let session = state
        .session(session_id)
        .ok_or_else(|| LockError::SessionNotFound(session_id.clone()))?;
    if session.is_terminal() {
        return Err(LockError::SessionTerminal(session_id.clone()));
    }

    let paths = dedupe_paths(paths);
    let conflicts: Vec<LockConflict> = paths
        .iter()
        .filter_map(|path| {
            state.locks.get(path).and_then(|lock| {
                if &lock.session_id != session_id {
                    Some(LockConflict {
                        path: path.clone(),
                        held_by: lock.session_id.clone(),
                    })
                } else {
                    None
                }
            })
        })
        .collect();

    if !conflicts.is_empty() {
        return Ok((AcquireOutcome::Conflict { conflicts }, Vec::new()));
    }

    // Idempotent: paths already held by this same session aren't re-inserted.
    let missing: Vec<String> = paths
        .iter()
        .filter(|p| state.locks.get(*p).is_none())
        .cloned()
        .collect();

    let events = if missing.is_empty() {
        Vec::new()
    } else {
        vec![Event::LockAcquired {
            session_id: session_id.clone(),
            paths: missing,
            at_ms: now_ms,
        }]
    };
    Ok((AcquireOutcome::Ok { locked: paths }, events))
}

/// Pure event builder for a lock transfer, meant to be merged into the
/// same transaction as the child session's creation so there is never a
/// window where the files are unlocked (§4.5 "atomic handoff").
pub fn transfer_events(from: &SessionId, to: &SessionId, now_ms: i64) -> Vec<Event> {
    vec![Event::LockTransferred {
        from: from.clone(),
        to: to.clone(),
        at_ms: now_ms,
    }]
}

/// Pure event builder for releasing every lock held by `session_id`.
pub fn release_events(session_id: &SessionId, now_ms: i64) -> Vec<Event> {
    vec![Event::LockReleased {
        session_id: session_id.clone(),
        at_ms: now_ms,
    }]
}

pub fn conflict_status(state: &MaterializedState, paths: &[String]) -> Vec<LockStatus> {
    paths
        .iter()
        .filter_map(|path| {
            let lock = state.locks.get(path)?;
            let session = state.session(&lock.session_id)?;
            Some(LockStatus {
                path: path.clone(),
                session_id: lock.session_id.clone(),
                branch: session.branch_name.clone(),
                status: session.status,
            })
        })
        .collect()
}

/// Thin convenience wrapper around [`Registry`] for the two operations
/// that stand alone as their own transaction (`acquire`, `release`). The
/// two that compose into a larger transaction (`transfer`, release-as-part
/// -of-a-terminal-transition) stay as the pure functions above so callers
/// can fold them into `Registry::in_tx` alongside other events.
pub struct LockManager {
    registry: Arc<Registry>,
}

impl LockManager {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn acquire(
        &self,
        session_id: &SessionId,
        paths: &[String],
        now_ms: i64,
    ) -> Result<AcquireOutcome, RegistryError> {
        self.registry.in_tx(|state| {
            plan_acquire(state, session_id, paths, now_ms)
                .map_err(|e| RegistryError::Domain(e.to_string()))
        })
    }

    pub fn release(&self, session_id: &SessionId, now_ms: i64) -> Result<(), RegistryError> {
        self.registry
            .in_tx(|_state| Ok(((), release_events(session_id, now_ms))))
    }

    pub fn conflict_status(&self, paths: &[String]) -> Vec<LockStatus> {
        self.registry.read(|state| conflict_status(state, paths))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
