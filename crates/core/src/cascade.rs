// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Cascade` entity: a weak grouping of repair sessions spawned from one
//! blast-radius analysis (component C4). Used for observability and for
//! linking remediation lineage — deleting a session never deletes its
//! cascade; deleting a cascade nulls the pointer in its sessions.

use crate::id::CascadeId;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeStatus {
    Analyzing,
    Dispatched,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One disjoint unit of repair work produced by the Auditor oracle's
/// `decompose` call, before the engine's invariants (disjointness,
/// confidence floor, parallelism cap) are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairJob {
    pub id: String,
    pub files: Vec<String>,
    pub prompt: String,
    pub priority: Priority,
    pub estimated_impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeTelemetry {
    pub dispatch_latency_ms: u64,
    pub conflict_count: u32,
    pub dispatched_count: u32,
    pub failed_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cascade {
    pub id: CascadeId,
    pub trigger_session_id: Option<SessionId>,
    pub core_files_changed: Vec<String>,
    pub downstream_files: Vec<String>,
    pub repair_job_count: u32,
    pub summary: String,
    pub status: CascadeStatus,
    pub telemetry: Option<CascadeTelemetry>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Cascade {
    pub fn new(
        id: CascadeId,
        trigger_session_id: Option<SessionId>,
        core_files_changed: Vec<String>,
        downstream_files: Vec<String>,
        repair_job_count: u32,
        summary: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            trigger_session_id,
            core_files_changed,
            downstream_files,
            repair_job_count,
            summary: summary.into(),
            status: CascadeStatus::Analyzing,
            telemetry: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn record_dispatch(&mut self, telemetry: CascadeTelemetry, now_ms: i64) {
        self.status = if telemetry.dispatched_count > 0 {
            CascadeStatus::Dispatched
        } else {
            CascadeStatus::Failed
        };
        self.telemetry = Some(telemetry);
        self.updated_at_ms = now_ms;
    }
}

/// Drop later occurrences of a path across jobs, tie-breaking in favor of
/// the higher-priority job first, then list order (§4.4 disjointness).
pub fn enforce_disjointness(mut jobs: Vec<RepairJob>) -> Vec<RepairJob> {
    jobs.sort_by(|a, b| b.priority.cmp(&a.priority));
    let mut claimed = std::collections::HashSet::new();
    for job in &mut jobs {
        job.files.retain(|f| claimed.insert(f.clone()));
    }
    jobs.retain(|j| !j.files.is_empty());
    jobs
}

/// Truncate to `max_parallel`, keeping the highest-priority jobs first
/// (§4.4 parallelism cap).
pub fn enforce_parallelism_cap(mut jobs: Vec<RepairJob>, max_parallel: usize) -> Vec<RepairJob> {
    jobs.sort_by(|a, b| b.priority.cmp(&a.priority));
    jobs.truncate(max_parallel);
    jobs
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
