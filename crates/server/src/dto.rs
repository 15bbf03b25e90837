// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level request/response shapes for the §6 route table. Kept as
//! plain per-route structs rather than one tagged `Request`/`Response`
//! enum — axum's `Json<T>` extractor wants a concrete type per handler,
//! so the tagged-enum shape the teacher's IPC protocol uses doesn't fit
//! here; the *spirit* (typed, explicit wire contracts, no raw
//! `serde_json::Value` passed to business logic) carries over instead.

use relay_core::cascade::Priority;
use relay_core::goal::AcceptanceCriterion;
use relay_core::session::SessionStatus;
use relay_core::{CascadeStatus, FileLock, Goal, RepairJob, Session};
use relay_engine::{CascadeDispatchOutcome, CascadeResponse};
use relay_locks::LockConflict;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceCriterionDto {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub met: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub evidence_files: Vec<String>,
}

impl From<&AcceptanceCriterion> for AcceptanceCriterionDto {
    fn from(c: &AcceptanceCriterion) -> Self {
        Self {
            id: c.id.clone(),
            text: c.text.clone(),
            met: c.met,
            reasoning: c.reasoning.clone(),
            evidence_files: c.evidence_files.clone(),
        }
    }
}

impl From<AcceptanceCriterionDto> for AcceptanceCriterion {
    fn from(dto: AcceptanceCriterionDto) -> Self {
        Self {
            id: dto.id,
            text: dto.text,
            met: dto.met,
            reasoning: dto.reasoning,
            evidence_files: dto.evidence_files,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub criteria: Vec<AcceptanceCriterionDto>,
    pub status: String,
    pub synthetic: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl From<&Goal> for GoalDto {
    fn from(g: &Goal) -> Self {
        Self {
            id: g.id.as_str().to_string(),
            title: g.title.clone(),
            description: g.description.clone(),
            criteria: g.criteria.iter().map(AcceptanceCriterionDto::from).collect(),
            status: format!("{:?}", g.status).to_lowercase(),
            synthetic: g.synthetic,
            created_at_ms: g.created_at_ms,
            updated_at_ms: g.updated_at_ms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<AcceptanceCriterionDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<AcceptanceCriterionDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListGoalsResponse {
    pub goals: Vec<GoalDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub goal_id: Option<String>,
    pub cascade_id: Option<String>,
    pub source_repo: String,
    pub branch_name: String,
    pub base_branch: String,
    pub external_agent_id: Option<String>,
    pub last_reviewed_commit: Option<String>,
    pub remediation_depth: u32,
    pub status: SessionStatus,
    pub last_error: Option<String>,
    pub last_synced_at_ms: Option<i64>,
}

impl From<&Session> for SessionDto {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.as_str().to_string(),
            goal_id: s.goal_id.as_ref().map(|id| id.as_str().to_string()),
            cascade_id: s.cascade_id.as_ref().map(|id| id.as_str().to_string()),
            source_repo: s.source_repo.clone(),
            branch_name: s.branch_name.clone(),
            base_branch: s.base_branch.clone(),
            external_agent_id: s.external_agent_id.clone(),
            last_reviewed_commit: s.last_reviewed_commit.clone(),
            remediation_depth: s.remediation_depth,
            status: s.status,
            last_error: s.last_error.clone(),
            last_synced_at_ms: s.last_synced_at_ms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateSessionResponse {
    pub success: bool,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockDto {
    pub path: String,
    pub session_id: String,
    pub locked_at_ms: i64,
}

impl From<&FileLock> for LockDto {
    fn from(l: &FileLock) -> Self {
        Self {
            path: l.file_path.clone(),
            session_id: l.session_id.as_str().to_string(),
            locked_at_ms: l.locked_at_ms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListLocksResponse {
    pub locks: Vec<LockDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeLocksResponse {
    pub released_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDto {
    pub path: String,
    pub held_by: String,
}

impl From<&LockConflict> for ConflictDto {
    fn from(c: &LockConflict) -> Self {
        Self {
            path: c.path.clone(),
            held_by: c.held_by.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreFileDiffDto {
    pub path: String,
    pub diff: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeAnalyzeRequest {
    #[serde(default)]
    pub core_file_diffs: Vec<CoreFileDiffDto>,
    #[serde(default)]
    pub changed_paths: Vec<String>,
    #[serde(default)]
    pub trigger_session_id: Option<String>,
    #[serde(default)]
    pub goal_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairJobDto {
    pub id: String,
    pub files: Vec<String>,
    pub prompt: String,
    pub priority: Priority,
    #[serde(default)]
    pub estimated_impact: String,
}

impl From<RepairJobDto> for RepairJob {
    fn from(dto: RepairJobDto) -> Self {
        Self {
            id: dto.id,
            files: dto.files,
            prompt: dto.prompt,
            priority: dto.priority,
            estimated_impact: dto.estimated_impact,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorBatchRequest {
    #[serde(default)]
    pub goal_id: Option<String>,
    pub jobs: Vec<RepairJobDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeTelemetryDto {
    pub dispatch_latency_ms: u64,
    pub conflict_count: u32,
    pub dispatched_count: u32,
    pub failed_count: u32,
}

impl From<&relay_core::CascadeTelemetry> for CascadeTelemetryDto {
    fn from(t: &relay_core::CascadeTelemetry) -> Self {
        Self {
            dispatch_latency_ms: t.dispatch_latency_ms,
            conflict_count: t.conflict_count,
            dispatched_count: t.dispatched_count,
            failed_count: t.failed_count,
        }
    }
}

/// §4.4 "overall response contract" serialized verbatim: conflict,
/// dispatched (possibly partial), or not-dispatched (sub-confidence-floor
/// or no cascade detected).
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CascadeResponseDto {
    Conflict { conflicts: Vec<ConflictDto> },
    Dispatched {
        cascade_id: String,
        cascade_status: String,
        telemetry: CascadeTelemetryDto,
        dispatched_sessions: Vec<String>,
    },
    NotDispatched { cascade_id: String },
}

impl From<CascadeResponse> for CascadeResponseDto {
    fn from(resp: CascadeResponse) -> Self {
        match resp {
            CascadeResponse::Conflict { conflicts } => CascadeResponseDto::Conflict {
                conflicts: conflicts.iter().map(ConflictDto::from).collect(),
            },
            CascadeResponse::Dispatched(CascadeDispatchOutcome {
                cascade_id,
                status,
                telemetry,
                dispatched_sessions,
            }) => CascadeResponseDto::Dispatched {
                cascade_id: cascade_id.as_str().to_string(),
                cascade_status: cascade_status_str(status),
                telemetry: CascadeTelemetryDto::from(&telemetry),
                dispatched_sessions: dispatched_sessions.iter().map(|s| s.as_str().to_string()).collect(),
            },
            CascadeResponse::NotDispatched { cascade_id } => {
                CascadeResponseDto::NotDispatched { cascade_id: cascade_id.as_str().to_string() }
            }
        }
    }
}

fn cascade_status_str(status: CascadeStatus) -> String {
    format!("{status:?}").to_lowercase()
}

/// `/orchestrator/batch` has its own flat shape (§6) rather than the
/// tagged cascade-response shape, since a batch dispatch can't be
/// `NotDispatched` (the jobs are already decided).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorBatchResponse {
    pub batch_id: String,
    pub dispatched_count: u32,
    pub failed_count: u32,
    pub sessions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_conflicts: Option<Vec<ConflictDto>>,
    pub telemetry: CascadeTelemetryDto,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub session: Option<SessionDto>,
    pub external_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_proposal_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBatchRequest {
    pub session_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBatchResult {
    pub session_id: String,
    pub external_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncBatchResponse {
    pub results: Vec<SyncBatchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub received: bool,
    pub event_type: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_trigger: Option<String>,
}
