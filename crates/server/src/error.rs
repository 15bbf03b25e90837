// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The eight semantic error kinds of §7, translated to HTTP. Provider
//! errors are deliberately *not* a 4xx/5xx at this layer: per §7 kind 6,
//! a provider failure is non-fatal at the HTTP level (the caller — a
//! webhook sender — must not be induced to retry) even though it is fatal
//! at the session level, which is handled upstream by the engine marking
//! the session *failed*.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_engine::EngineError;
use relay_locks::LockConflict;
use serde::Serialize;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// §7 kind 1: bad HMAC or bad token. Never retried by the caller.
    AuthenticationFailure,
    /// §7 kind 2: request body does not match the expected schema.
    ValidationFailure(String),
    /// §7 kind 4: unknown goal/session/cascade.
    NotFound(String),
    /// §7 kind 5: lock acquisition blocked. Structured `{path, heldBy}` rows.
    Conflict(Vec<LockConflict>),
    /// §7 kind 6/7: the Agent/VCS/Auditor provider returned a non-success,
    /// or was rate-limited. Surfaced as 200 with a failed-result body so
    /// webhook senders don't retry; the session itself carries the failure.
    ProviderError(String),
    /// §7 kind 8: invariant violation or storage failure.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::GoalNotFound(id) => ApiError::NotFound(format!("goal {id}")),
            EngineError::SessionNotFound(id) => ApiError::NotFound(format!("session {id}")),
            EngineError::CascadeNotFound(id) => ApiError::NotFound(format!("cascade {id}")),
            EngineError::Provider(e) => ApiError::ProviderError(e.to_string()),
            EngineError::InvalidConfig(msg) => ApiError::ValidationFailure(msg),
            EngineError::Registry(e) => ApiError::Internal(e.to_string()),
            EngineError::Domain(e) => ApiError::Internal(e.to_string()),
            EngineError::Lock(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ConflictRow<'a> {
    path: &'a str,
    held_by: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthenticationFailure => {
                (StatusCode::UNAUTHORIZED, ()).into_response()
            }
            ApiError::ValidationFailure(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": what }))).into_response()
            }
            ApiError::Conflict(conflicts) => {
                let rows: Vec<ConflictRow<'_>> = conflicts
                    .iter()
                    .map(|c| ConflictRow {
                        path: &c.path,
                        held_by: c.held_by.as_str(),
                    })
                    .collect();
                (StatusCode::CONFLICT, Json(json!({ "conflicts": rows }))).into_response()
            }
            ApiError::ProviderError(msg) => (
                StatusCode::OK,
                Json(json!({ "result": format!("provider call failed: {msg}") })),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
