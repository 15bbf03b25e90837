// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/goals` and `/goals/{id}` (§6): Goal CRUD plus the re-audit trigger.

use crate::dto::{CreateGoalRequest, GoalDto, ListGoalsResponse, UpdateGoalRequest};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use relay_core::id::GoalId;

pub async fn list_goals(State(state): State<AppState>) -> Result<Json<ListGoalsResponse>, ApiError> {
    let goals = state.engine.list_goals().iter().map(GoalDto::from).collect();
    Ok(Json(ListGoalsResponse { goals }))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalDto>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::ValidationFailure("title must not be empty".to_string()));
    }
    let criteria = req.criteria.into_iter().map(Into::into).collect();
    let id = state
        .engine
        .create_goal(req.title, req.description, criteria)
        .map_err(ApiError::from)?;
    let goal = state.engine.get_goal(&id).map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(GoalDto::from(&goal))))
}

pub async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalDto>, ApiError> {
    let goal = state.engine.get_goal(&GoalId::from(id)).map_err(ApiError::from)?;
    Ok(Json(GoalDto::from(&goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<GoalDto>, ApiError> {
    let goal_id = GoalId::from(id);
    let criteria = req.criteria.into_iter().map(Into::into).collect();
    state
        .engine
        .update_goal(&goal_id, req.title, req.description, criteria)
        .map_err(ApiError::from)?;
    let goal = state.engine.get_goal(&goal_id).map_err(ApiError::from)?;
    Ok(Json(GoalDto::from(&goal)))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_goal(&GoalId::from(id)).map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn re_audit_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state
        .engine
        .re_audit_goal(&GoalId::from(id))
        .await
        .map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({ "outcome": format!("{outcome:?}") })))
}
