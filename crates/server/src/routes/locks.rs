// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/locks` (§6): administrative read/purge over the Lock Manager's rows.

use crate::dto::{ListLocksResponse, LockDto, PurgeLocksResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub async fn list_locks(State(state): State<AppState>) -> Result<Json<ListLocksResponse>, ApiError> {
    let locks = state.engine.list_locks().iter().map(LockDto::from).collect();
    Ok(Json(ListLocksResponse { locks }))
}

pub async fn purge_locks(State(state): State<AppState>) -> Result<Json<PurgeLocksResponse>, ApiError> {
    let released_count = state.engine.purge_locks().map_err(ApiError::from)?;
    Ok(Json(PurgeLocksResponse { released_count }))
}
