// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal CRUD and the `/goals/{id}/re-audit` operation. Strictly
//! administrative: unlike C3/C4/C5 this module has no state-machine
//! invariants of its own beyond G1 (stable criterion ids), which is the
//! caller's responsibility on `update`.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::review::ReviewOutcome;
use relay_core::event::Event;
use relay_core::goal::AcceptanceCriterion;
use relay_core::id::GoalId;
use relay_core::{Clock, IdGen};
use relay_providers::{AgentProvider, AuditorOracle, VcsProvider};

impl<Au, Ag, Vc, C, I> Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    pub fn create_goal(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        criteria: Vec<AcceptanceCriterion>,
    ) -> Result<GoalId, EngineError> {
        let goal_id = self.ids.goal_id();
        let now_ms = self.now_ms();
        let title = title.into();
        let description = description.into();
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::GoalCreated {
                    id: goal_id.clone(),
                    title: title.clone(),
                    description: description.clone(),
                    criteria: criteria.clone(),
                    synthetic: false,
                    at_ms: now_ms,
                }],
            ))
        })?;
        Ok(goal_id)
    }

    pub fn list_goals(&self) -> Vec<relay_core::Goal> {
        self.registry.list_goals()
    }

    pub fn get_goal(&self, goal_id: &GoalId) -> Result<relay_core::Goal, EngineError> {
        self.registry
            .read_goal_by_id(goal_id)
            .ok_or_else(|| EngineError::GoalNotFound(goal_id.to_string()))
    }

    /// Full-rewrite update (§3 ownership: "Goal owns its criteria list;
    /// updates are full-rewrite under the goal's row lock").
    pub fn update_goal(
        &self,
        goal_id: &GoalId,
        title: impl Into<String>,
        description: impl Into<String>,
        criteria: Vec<AcceptanceCriterion>,
    ) -> Result<(), EngineError> {
        let now_ms = self.now_ms();
        let title = title.into();
        let description = description.into();
        self.registry.in_tx(|state| {
            if state.goal(goal_id).is_none() {
                return Err(relay_storage::RegistryError::Domain(format!("unknown goal {goal_id}")));
            }
            Ok((
                (),
                vec![Event::GoalUpdated {
                    id: goal_id.clone(),
                    title: title.clone(),
                    description: description.clone(),
                    criteria: criteria.clone(),
                    at_ms: now_ms,
                }],
            ))
        })
        .map_err(|e| match e {
            relay_storage::RegistryError::Domain(msg) if msg.starts_with("unknown goal") => {
                EngineError::GoalNotFound(goal_id.to_string())
            }
            other => EngineError::Registry(other),
        })?;
        Ok(())
    }

    /// Deleting a goal never deletes its sessions (§3 ownership); their
    /// `goalId` pointer is nulled by `MaterializedState::apply`.
    pub fn delete_goal(&self, goal_id: &GoalId) -> Result<(), EngineError> {
        if self.registry.read_goal_by_id(goal_id).is_none() {
            return Err(EngineError::GoalNotFound(goal_id.to_string()));
        }
        self.registry
            .in_tx(|_state| Ok(((), vec![Event::GoalDeleted { id: goal_id.clone() }])))?;
        Ok(())
    }

    /// `/goals/{id}/re-audit`: re-runs the review loop against the most
    /// recently touched session for this goal, using that session's last
    /// reviewed commit — there is no goal-level "last commit" field, so the
    /// session record is the source of truth. Uses the forced variant of the
    /// review loop since re-auditing the exact commit a session already
    /// reviewed is the point of this route, not a redelivery to suppress.
    pub async fn re_audit_goal(&self, goal_id: &GoalId) -> Result<ReviewOutcome, EngineError> {
        let session = self
            .registry
            .read(|state| state.sessions_for_goal(goal_id).first().cloned().cloned())
            .ok_or_else(|| EngineError::GoalNotFound(goal_id.to_string()))?;
        let commit = session
            .last_reviewed_commit
            .clone()
            .ok_or_else(|| EngineError::InvalidConfig(format!("goal {goal_id} has no reviewed commit yet")))?;
        self.review_commit_forced(&session.source_repo, &session.branch_name, &commit, None)
            .await
    }

    /// Administrative lock purge (`DELETE /locks`): releases every lock in
    /// the registry without transitioning the owning sessions, unlike
    /// `force_terminate`. Returns the number of lock rows removed.
    pub fn purge_locks(&self) -> Result<u32, EngineError> {
        let locks = self.registry.list_locks();
        let count = locks.len() as u32;
        let mut seen = std::collections::HashSet::new();
        let now_ms = self.now_ms();
        for lock in &locks {
            if seen.insert(lock.session_id.clone()) {
                self.locks.release(&lock.session_id, now_ms)?;
            }
        }
        Ok(count)
    }

    pub fn list_locks(&self) -> Vec<relay_core::FileLock> {
        self.registry.list_locks()
    }
}

#[cfg(test)]
#[path = "goal_tests.rs"]
mod tests;
