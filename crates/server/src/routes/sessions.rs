// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/sessions` (§6): read-only listing plus the administrative terminate action.

use crate::dto::{ListSessionsResponse, SessionDto, TerminateSessionResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use relay_core::id::SessionId;

pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<ListSessionsResponse>, ApiError> {
    let sessions = state
        .engine
        .registry()
        .list_active_sessions()
        .iter()
        .map(SessionDto::from)
        .collect();
    Ok(Json(ListSessionsResponse { sessions }))
}

pub async fn terminate_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TerminateSessionResponse>, ApiError> {
    let session_id = SessionId::from(id);
    state.engine.force_terminate(&session_id).map_err(ApiError::from)?;
    Ok(Json(TerminateSessionResponse {
        success: true,
        session_id: session_id.as_str().to_string(),
    }))
}
