// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/orchestrator/*` (§6): the explicit-jobs dispatch path, plus the
//! Agent Provider polling surface the orchestrator uses to pull status.

use crate::dto::{
    ConflictDto, OrchestratorBatchRequest, OrchestratorBatchResponse, SyncBatchRequest, SyncBatchResponse,
    SyncBatchResult, SyncRequest, SyncResponse,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use relay_core::id::{GoalId, SessionId};
use relay_engine::{CascadeResponse, SyncOutcome};

pub async fn batch(
    State(state): State<AppState>,
    Json(req): Json<OrchestratorBatchRequest>,
) -> Result<Json<OrchestratorBatchResponse>, ApiError> {
    let goal_id = req.goal_id.map(GoalId::from);
    let jobs = req.jobs.into_iter().map(Into::into).collect();

    let response = state.engine.dispatch_batch(goal_id, jobs).await.map_err(ApiError::from)?;

    match response {
        CascadeResponse::Conflict { conflicts } => Ok(Json(OrchestratorBatchResponse {
            batch_id: String::new(),
            dispatched_count: 0,
            failed_count: conflicts.len() as u32,
            sessions: Vec::new(),
            lock_conflicts: Some(conflicts.iter().map(ConflictDto::from).collect()),
            telemetry: (&relay_core::CascadeTelemetry::default()).into(),
        })),
        CascadeResponse::Dispatched(outcome) => Ok(Json(OrchestratorBatchResponse {
            batch_id: outcome.cascade_id.as_str().to_string(),
            dispatched_count: outcome.telemetry.dispatched_count,
            failed_count: outcome.telemetry.failed_count,
            sessions: outcome.dispatched_sessions.iter().map(|s| s.as_str().to_string()).collect(),
            lock_conflicts: None,
            telemetry: (&outcome.telemetry).into(),
        })),
        CascadeResponse::NotDispatched { cascade_id } => Ok(Json(OrchestratorBatchResponse {
            batch_id: cascade_id.as_str().to_string(),
            dispatched_count: 0,
            failed_count: 0,
            sessions: Vec::new(),
            lock_conflicts: None,
            telemetry: (&relay_core::CascadeTelemetry::default()).into(),
        })),
    }
}

pub async fn sync(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let session_id = SessionId::from(req.session_id);
    let outcome = state.engine.sync(&session_id).await.map_err(ApiError::from)?;
    Ok(Json(sync_response(&state, &session_id, outcome)))
}

pub async fn sync_batch(
    State(state): State<AppState>,
    Json(req): Json<SyncBatchRequest>,
) -> Result<Json<SyncBatchResponse>, ApiError> {
    let mut results = Vec::with_capacity(req.session_ids.len());
    for raw_id in req.session_ids {
        let session_id = SessionId::from(raw_id);
        match state.engine.sync(&session_id).await {
            Ok(outcome) => {
                let response = sync_response(&state, &session_id, outcome);
                results.push(SyncBatchResult {
                    session_id: session_id.as_str().to_string(),
                    external_status: response.external_status,
                    error: None,
                });
            }
            Err(e) => results.push(SyncBatchResult {
                session_id: session_id.as_str().to_string(),
                external_status: "error".to_string(),
                error: Some(e.to_string()),
            }),
        }
    }
    Ok(Json(SyncBatchResponse { results }))
}

/// The change-proposal URL itself isn't returned by `Engine::sync` — it's
/// recorded directly onto the goal's review artifacts when the session
/// completes, so it isn't duplicated here.
fn sync_response(state: &AppState, session_id: &SessionId, outcome: SyncOutcome) -> SyncResponse {
    let session = state.engine.registry().read_session_by_id(session_id);
    let external_status = match outcome {
        SyncOutcome::NoOp => "unchanged".to_string(),
        SyncOutcome::UnknownSession => "unknown".to_string(),
        SyncOutcome::Transitioned(status) => format!("{status:?}").to_lowercase(),
    };
    SyncResponse {
        session: session.as_ref().map(crate::dto::SessionDto::from),
        external_status,
        change_proposal_url: None,
    }
}
