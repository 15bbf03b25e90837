// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Session` entity and its lifecycle state machine (component C3).
//! One session is one supervised unit of agent work: a branch, a lock set,
//! and a remediation lineage bounded by [`MAX_REMEDIATION_DEPTH`].

use crate::error::DomainError;
use crate::id::{CascadeId, GoalId};
use serde::{Deserialize, Serialize};

pub use crate::id::SessionId;

/// Invariant S3: no session is ever created or dispatched with a greater depth.
pub const MAX_REMEDIATION_DEPTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Queued,
    Executing,
    Verifying,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Invariant S2: completed/failed are terminal, no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub goal_id: Option<GoalId>,
    pub cascade_id: Option<CascadeId>,
    pub source_repo: String,
    pub branch_name: String,
    pub base_branch: String,
    pub external_agent_id: Option<String>,
    pub last_reviewed_commit: Option<String>,
    pub remediation_depth: u32,
    pub status: SessionStatus,
    pub last_error: Option<String>,
    pub last_synced_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Construction parameters for a fresh session, mirroring `create(spec)`
/// in the transition table (§4.3).
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub goal_id: Option<GoalId>,
    pub cascade_id: Option<CascadeId>,
    pub source_repo: String,
    pub branch_name: String,
    pub base_branch: String,
    pub remediation_depth: u32,
}

impl Session {
    pub fn new(id: SessionId, spec: SessionSpec, now_ms: i64) -> Result<Self, DomainError> {
        if spec.remediation_depth > MAX_REMEDIATION_DEPTH {
            return Err(DomainError::RemediationDepthExceeded {
                depth: spec.remediation_depth,
                max: MAX_REMEDIATION_DEPTH,
            });
        }
        Ok(Self {
            id,
            goal_id: spec.goal_id,
            cascade_id: spec.cascade_id,
            source_repo: spec.source_repo,
            branch_name: spec.branch_name,
            base_branch: spec.base_branch,
            external_agent_id: None,
            last_reviewed_commit: None,
            remediation_depth: spec.remediation_depth,
            status: SessionStatus::Queued,
            last_error: None,
            last_synced_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Guarded transition: a no-op once the session is terminal, matching
    /// the transition table's "completed/failed, any -> ignored" row.
    fn set_status(&mut self, status: SessionStatus, now_ms: i64) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.updated_at_ms = now_ms;
    }

    pub fn accept_by_agent(&mut self, external_agent_id: impl Into<String>, now_ms: i64) {
        if self.status.is_terminal() {
            return;
        }
        self.external_agent_id = Some(external_agent_id.into());
        self.set_status(SessionStatus::Executing, now_ms);
    }

    pub fn reject_by_agent(&mut self, reason: impl Into<String>, now_ms: i64) {
        self.last_error = Some(reason.into());
        self.set_status(SessionStatus::Failed, now_ms);
    }

    pub fn enter_verifying(&mut self, now_ms: i64) {
        self.set_status(SessionStatus::Verifying, now_ms);
    }

    pub fn complete(&mut self, now_ms: i64) {
        self.set_status(SessionStatus::Completed, now_ms);
    }

    /// Marks the session failed, recording `reason` idempotently: the
    /// first failure reason wins so a retried failure path doesn't
    /// overwrite the cause an operator already saw.
    pub fn fail(&mut self, reason: impl Into<String>, now_ms: i64) {
        if self.status.is_terminal() {
            return;
        }
        if self.last_error.is_none() {
            self.last_error = Some(reason.into());
        }
        self.set_status(SessionStatus::Failed, now_ms);
    }

    pub fn record_reviewed_commit(&mut self, commit: impl Into<String>, now_ms: i64) {
        self.last_reviewed_commit = Some(commit.into());
        self.updated_at_ms = now_ms;
    }

    /// `true` when `commit` was already the last one reviewed — the caller
    /// should short-circuit to `duplicate_commit_skipped`.
    pub fn is_duplicate_commit(&self, commit: &str) -> bool {
        self.last_reviewed_commit.as_deref() == Some(commit)
    }

    pub fn record_sync(&mut self, now_ms: i64) {
        self.last_synced_at_ms = Some(now_ms);
    }

    /// Builds the spec for a remediation child: same branch/base/goal,
    /// depth + 1, guarded against S3 by the caller checking depth first.
    pub fn child_spec(&self, cascade_id: Option<CascadeId>) -> SessionSpec {
        SessionSpec {
            goal_id: self.goal_id.clone(),
            cascade_id: cascade_id.or_else(|| self.cascade_id.clone()),
            source_repo: self.source_repo.clone(),
            branch_name: self.branch_name.clone(),
            base_branch: self.base_branch.clone(),
            remediation_depth: self.remediation_depth + 1,
        }
    }

    pub fn at_max_remediation_depth(&self) -> bool {
        self.remediation_depth >= MAX_REMEDIATION_DEPTH
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
