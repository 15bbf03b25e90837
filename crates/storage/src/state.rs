// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The materialized read model: an in-memory projection of every event
//! ever applied, rebuilt by replaying the WAL over a snapshot.
//!
//! All event handlers in [`MaterializedState::apply`] MUST be idempotent —
//! the WAL can be replayed more than once over the same prefix during
//! crash recovery. The pattern throughout: guard inserts with existence
//! checks, guard status changes with terminal-state checks, and use
//! assignment (not increment/append) wherever the event itself carries the
//! resulting value rather than a delta.

use relay_core::cascade::CascadeStatus;
use relay_core::event::Event;
use relay_core::id::{CascadeId, GoalId};
use relay_core::session::{Session, SessionId, SessionStatus};
use relay_core::{Cascade, FileLock, Goal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializedState {
    pub goals: HashMap<GoalId, Goal>,
    pub sessions: HashMap<SessionId, Session>,
    /// Keyed by file path: the `HashMap` key itself enforces invariant L1
    /// (one lock row per path) without a separate uniqueness check.
    pub locks: HashMap<String, FileLock>,
    pub cascades: HashMap<CascadeId, Cascade>,
}

impl MaterializedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::GoalCreated {
                id,
                title,
                description,
                criteria,
                synthetic,
                at_ms,
            } => {
                // Guard: a replayed create must not clobber later operator edits.
                if !self.goals.contains_key(id) {
                    let mut goal =
                        Goal::new(id.clone(), title.clone(), description.clone(), criteria.clone(), *at_ms);
                    goal.synthetic = *synthetic;
                    self.goals.insert(id.clone(), goal);
                }
            }
            Event::GoalCriteriaAssessed {
                id,
                assessment,
                at_ms,
            } => {
                if let Some(goal) = self.goals.get_mut(id) {
                    goal.merge_criteria_assessment(assessment, *at_ms);
                }
            }
            Event::GoalUpdated {
                id,
                title,
                description,
                criteria,
                at_ms,
            } => {
                if let Some(goal) = self.goals.get_mut(id) {
                    goal.apply_update(title.clone(), description.clone(), criteria.clone(), *at_ms);
                }
            }
            Event::GoalReviewArtifactAdded { id, artifact, at_ms } => {
                if let Some(goal) = self.goals.get_mut(id) {
                    goal.add_review_artifact(artifact.clone(), *at_ms);
                }
            }
            Event::GoalStatusChanged { id, status, at_ms } => {
                if let Some(goal) = self.goals.get_mut(id) {
                    goal.set_status(*status, *at_ms);
                }
            }
            Event::GoalDeleted { id } => {
                self.goals.remove(id);
                for session in self.sessions.values_mut() {
                    if session.goal_id.as_ref() == Some(id) {
                        session.goal_id = None;
                    }
                }
            }

            Event::SessionCreated { id, spec, at_ms } => {
                if !self.sessions.contains_key(id) {
                    // Replay must not fail on a spec that was valid when
                    // the event was first appended; invariants were
                    // already enforced at the write path.
                    if let Ok(session) = Session::new(id.clone(), spec.clone(), *at_ms) {
                        self.sessions.insert(id.clone(), session);
                    }
                }
            }
            Event::SessionAgentAccepted {
                id,
                external_agent_id,
                at_ms,
            } => {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.accept_by_agent(external_agent_id.clone(), *at_ms);
                }
            }
            Event::SessionStatusChanged {
                id,
                status,
                last_error,
                at_ms,
            } => {
                if let Some(session) = self.sessions.get_mut(id) {
                    match status {
                        SessionStatus::Executing => session.accept_by_agent(
                            session.external_agent_id.clone().unwrap_or_default(),
                            *at_ms,
                        ),
                        SessionStatus::Verifying => session.enter_verifying(*at_ms),
                        SessionStatus::Completed => session.complete(*at_ms),
                        SessionStatus::Failed => {
                            session.fail(last_error.clone().unwrap_or_default(), *at_ms)
                        }
                        SessionStatus::Queued => {}
                    }
                }
            }
            Event::SessionCommitReviewed { id, commit, at_ms } => {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.record_reviewed_commit(commit.clone(), *at_ms);
                }
            }
            Event::SessionSynced { id, at_ms } => {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.record_sync(*at_ms);
                }
            }

            Event::LockAcquired {
                session_id,
                paths,
                at_ms,
            } => {
                for path in paths {
                    // Guard: never clobber a lock already held by someone else.
                    self.locks.entry(path.clone()).or_insert_with(|| FileLock {
                        file_path: path.clone(),
                        session_id: session_id.clone(),
                        locked_at_ms: *at_ms,
                    });
                }
            }
            Event::LockTransferred { from, to, .. } => {
                for lock in self.locks.values_mut() {
                    if &lock.session_id == from {
                        lock.session_id = to.clone();
                    }
                }
            }
            Event::LockReleased { session_id, .. } => {
                self.locks.retain(|_, lock| &lock.session_id != session_id);
            }

            Event::CascadeCreated {
                id,
                trigger_session_id,
                core_files_changed,
                downstream_files,
                repair_job_count,
                summary,
                at_ms,
            } => {
                if !self.cascades.contains_key(id) {
                    self.cascades.insert(
                        id.clone(),
                        Cascade::new(
                            id.clone(),
                            trigger_session_id.clone(),
                            core_files_changed.clone(),
                            downstream_files.clone(),
                            *repair_job_count,
                            summary.clone(),
                            *at_ms,
                        ),
                    );
                }
            }
            Event::CascadeDispatchRecorded { id, telemetry, at_ms } => {
                if let Some(cascade) = self.cascades.get_mut(id) {
                    cascade.record_dispatch(telemetry.clone(), *at_ms);
                }
            }
        }
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.get(id)
    }

    pub fn cascade(&self, id: &CascadeId) -> Option<&Cascade> {
        self.cascades.get(id)
    }

    /// Invariant L2 read-model: every non-terminal session.
    pub fn active_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| !s.is_terminal())
    }

    /// Component C5 step 1: the most recent non-terminal session for a
    /// `(repo, branch)` pair, by creation time.
    pub fn latest_active_session_for_branch(
        &self,
        source_repo: &str,
        branch_name: &str,
    ) -> Option<&Session> {
        self.sessions
            .values()
            .filter(|s| {
                !s.is_terminal() && s.source_repo == source_repo && s.branch_name == branch_name
            })
            .max_by_key(|s| s.created_at_ms)
    }

    pub fn locks_for_session(&self, id: &SessionId) -> Vec<&FileLock> {
        self.locks.values().filter(|l| &l.session_id == id).collect()
    }

    pub fn cascades_by_status(&self, status: CascadeStatus) -> Vec<&Cascade> {
        self.cascades.values().filter(|c| c.status == status).collect()
    }

    /// All sessions bound to a given goal, most recently created first —
    /// used by the re-audit route to find the goal's last reviewed commit.
    pub fn sessions_for_goal(&self, id: &GoalId) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self
            .sessions
            .values()
            .filter(|s| s.goal_id.as_ref() == Some(id))
            .collect();
        sessions.sort_by_key(|s| std::cmp::Reverse(s.created_at_ms));
        sessions
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
