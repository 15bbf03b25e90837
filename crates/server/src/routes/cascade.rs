// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/cascade/analyze` (§6, §4.4): runs the Auditor's decompose call and
//! dispatches the resulting repair jobs under the engine's invariants.

use crate::dto::{CascadeAnalyzeRequest, CascadeResponseDto};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use relay_core::id::GoalId;
use relay_engine::CascadeResponse;
use relay_providers::auditor::{CoreFileDiff, DecomposeInput};

pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<CascadeAnalyzeRequest>,
) -> Result<Json<CascadeResponseDto>, ApiError> {
    let decompose_input = DecomposeInput {
        core_file_diffs: req
            .core_file_diffs
            .into_iter()
            .map(|d| CoreFileDiff { path: d.path, diff: d.diff })
            .collect(),
        changed_paths: req.changed_paths,
    };
    let trigger_session_id = req.trigger_session_id.map(Into::into);
    let goal_id = req.goal_id.map(GoalId::from);

    let response = state
        .engine
        .analyze_and_dispatch(trigger_session_id, goal_id, decompose_input)
        .await
        .map_err(ApiError::from)?;

    match response {
        CascadeResponse::Conflict { conflicts } => Err(ApiError::Conflict(conflicts)),
        other => Ok(Json(CascadeResponseDto::from(other))),
    }
}
