// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Registry Store (component C1): the transactional substrate every
//! other component is built on. Exposes exactly four operations upward —
//! [`Registry::in_tx`], [`Registry::read_session_by_id`],
//! [`Registry::read_goal_by_id`], [`Registry::list_active_sessions`] —
//! everything else (locks, sessions, cascades) lives in the crates that
//! consume this one.

use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use crate::wal::{scan_wal, Wal, WalError};
use parking_lot::Mutex;
use relay_core::event::Event;
use relay_core::id::GoalId;
use relay_core::session::{Session, SessionId};
use relay_core::Goal;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("wal error: {0}")]
    Wal(#[from] WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("{0}")]
    Domain(String),
}

pub struct Registry {
    wal: Mutex<Wal>,
    state: Mutex<MaterializedState>,
    snapshot_path: PathBuf,
    next_seq: AtomicU64,
}

impl Registry {
    /// Opens (or creates) the registry at `wal_path`/`snapshot_path`: loads
    /// the last snapshot if present, then replays every WAL entry after it.
    pub fn open(wal_path: &Path, snapshot_path: &Path) -> Result<Self, RegistryError> {
        let snapshot = Snapshot::load(snapshot_path)?;
        let mut state = snapshot
            .as_ref()
            .map(|s| s.state.clone())
            .unwrap_or_default();
        let snapshot_seq = snapshot.map(|s| s.seq).unwrap_or(0);

        let scan = scan_wal(wal_path)?;
        for record in scan.records.iter().filter(|r| r.seq > snapshot_seq) {
            state.apply(&record.event);
        }
        let next_seq = scan.max_seq.map(|s| s + 1).unwrap_or(snapshot_seq + 1);
        let wal = Wal::open(wal_path, next_seq)?;

        Ok(Self {
            wal: Mutex::new(wal),
            state: Mutex::new(state),
            snapshot_path: snapshot_path.to_path_buf(),
            next_seq: AtomicU64::new(next_seq),
        })
    }

    /// Runs `f` against the current state to decide what happened, then
    /// appends and applies the events it returns, all while holding the
    /// state lock — this is what makes the read-decide-write sequence
    /// serializable with respect to every other `in_tx` call, which is how
    /// invariants L1 (lock exclusivity) and S2 (terminal sessions are
    /// final) hold even under concurrent requests.
    pub fn in_tx<T>(
        &self,
        f: impl FnOnce(&MaterializedState) -> Result<(T, Vec<Event>), RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut state = self.state.lock();
        let (result, events) = f(&state)?;
        if !events.is_empty() {
            let mut wal = self.wal.lock();
            for event in &events {
                wal.append(event.clone())?;
            }
            wal.flush()?;
            self.next_seq
                .fetch_add(events.len() as u64, Ordering::SeqCst);
        }
        for event in &events {
            state.apply(event);
        }
        Ok(result)
    }

    pub fn read_session_by_id(&self, id: &SessionId) -> Option<Session> {
        self.state.lock().session(id).cloned()
    }

    pub fn read_goal_by_id(&self, id: &GoalId) -> Option<Goal> {
        self.state.lock().goal(id).cloned()
    }

    pub fn list_active_sessions(&self) -> Vec<Session> {
        self.state.lock().active_sessions().cloned().collect()
    }

    /// Administrative surfaces (`relay_server`'s `/goals` and `/locks`
    /// routes) read the full materialized collections rather than the
    /// invariant-scoped helpers above, via the `read` escape hatch.
    pub fn list_goals(&self) -> Vec<Goal> {
        self.state.lock().goals.values().cloned().collect()
    }

    pub fn list_locks(&self) -> Vec<relay_core::FileLock> {
        self.state.lock().locks.values().cloned().collect()
    }

    /// Escape hatch for components that need a consistent read across
    /// several entities at once (e.g. the Cascade Engine checking both
    /// sessions and locks before dispatch). Still runs under the state
    /// lock so it observes the same snapshot `in_tx` would.
    pub fn read<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        f(&self.state.lock())
    }

    /// Snapshot current state at the latest applied sequence and truncate
    /// the WAL prefix it now makes redundant. Safe to call at any time;
    /// intended to run on a timer (see `relay_server`'s checkpoint task).
    pub fn checkpoint(&self) -> Result<(), RegistryError> {
        let seq = self.next_seq.load(Ordering::SeqCst);
        let state = self.state.lock().clone();
        Snapshot::new(seq.saturating_sub(1), state).save(&self.snapshot_path)?;
        self.wal.lock().truncate_before(seq)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
