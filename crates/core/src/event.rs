// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The append-only event vocabulary persisted by the Registry Store's WAL.
//! Every mutation any component makes is expressed as one of these variants
//! so the materialized state in `relay-storage` can be rebuilt by replay.
//!
//! Handlers that apply these events (see `relay_storage::state::apply_event`)
//! MUST be idempotent: the WAL can be replayed more than once over the same
//! prefix during crash recovery, and a snapshot may already reflect part of
//! the log.

use crate::cascade::CascadeTelemetry;
use crate::goal::{CriterionAssessment, ReviewArtifact};
use crate::id::{CascadeId, GoalId};
use crate::session::{SessionId, SessionSpec, SessionStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GoalCreated {
        id: GoalId,
        title: String,
        description: String,
        criteria: Vec<crate::goal::AcceptanceCriterion>,
        synthetic: bool,
        at_ms: i64,
    },
    GoalCriteriaAssessed {
        id: GoalId,
        assessment: HashMap<String, CriterionAssessment>,
        at_ms: i64,
    },
    /// Operator edit (`PATCH /goals/{id}`): full-rewrite of title,
    /// description, and criteria list, per §3's "Goal owns its criteria
    /// list (updates are full-rewrite under the goal's row lock)".
    GoalUpdated {
        id: GoalId,
        title: String,
        description: String,
        criteria: Vec<crate::goal::AcceptanceCriterion>,
        at_ms: i64,
    },
    GoalReviewArtifactAdded {
        id: GoalId,
        artifact: ReviewArtifact,
        at_ms: i64,
    },
    GoalStatusChanged {
        id: GoalId,
        status: crate::goal::GoalStatus,
        at_ms: i64,
    },
    GoalDeleted {
        id: GoalId,
    },

    SessionCreated {
        id: SessionId,
        spec: SessionSpec,
        at_ms: i64,
    },
    SessionAgentAccepted {
        id: SessionId,
        external_agent_id: String,
        at_ms: i64,
    },
    SessionStatusChanged {
        id: SessionId,
        status: SessionStatus,
        last_error: Option<String>,
        at_ms: i64,
    },
    SessionCommitReviewed {
        id: SessionId,
        commit: String,
        at_ms: i64,
    },
    SessionSynced {
        id: SessionId,
        at_ms: i64,
    },

    LockAcquired {
        session_id: SessionId,
        paths: Vec<String>,
        at_ms: i64,
    },
    LockTransferred {
        from: SessionId,
        to: SessionId,
        at_ms: i64,
    },
    LockReleased {
        session_id: SessionId,
        at_ms: i64,
    },

    CascadeCreated {
        id: CascadeId,
        trigger_session_id: Option<SessionId>,
        core_files_changed: Vec<String>,
        downstream_files: Vec<String>,
        repair_job_count: u32,
        summary: String,
        at_ms: i64,
    },
    CascadeDispatchRecorded {
        id: CascadeId,
        telemetry: CascadeTelemetry,
        at_ms: i64,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
