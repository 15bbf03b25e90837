// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/webhook/vcs` (§6): the single inbound surface for `push`,
//! `pull_request`, and `check_run` events. HMAC-verified, then routed to
//! the Review & Remediation Loop (C5) or the Session Lifecycle machine
//! (C3) depending on event type. Automated commits (bot author, or an
//! `[Auto]` marker in the message) are skipped so the remediation loop's
//! own commits never re-trigger itself.

use crate::auth::verify_webhook_signature;
use crate::dto::WebhookResponse;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use relay_engine::{CiCheckResult, CiOutcome, ReviewOutcome};
use serde::Deserialize;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const EVENT_HEADER: &str = "x-github-event";

#[derive(Debug, Deserialize)]
struct RepoRef {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PushCommit {
    id: String,
    message: String,
    author: CommitAuthor,
    #[serde(default)]
    added: Vec<String>,
    #[serde(default)]
    modified: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    repository: RepoRef,
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(default)]
    commits: Vec<PushCommit>,
    head_commit: Option<PushCommit>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
    #[serde(default)]
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestObj {
    number: u64,
    #[serde(default)]
    merged: bool,
    html_url: Option<String>,
    head: BranchRef,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: String,
    pull_request: PullRequestObj,
    repository: RepoRef,
}

#[derive(Debug, Deserialize)]
struct CheckRunObj {
    name: String,
    conclusion: Option<String>,
    #[serde(default)]
    head_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckRunPayload {
    check_run: CheckRunObj,
    repository: RepoRef,
}

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = header_str(&headers, SIGNATURE_HEADER)
        .ok_or(ApiError::AuthenticationFailure)?;
    verify_webhook_signature(&state.webhook_secret, &body, signature)?;

    let event_type = header_str(&headers, EVENT_HEADER)
        .ok_or_else(|| ApiError::ValidationFailure(format!("missing {EVENT_HEADER} header")))?
        .to_string();

    let result = match event_type.as_str() {
        "push" => handle_push(&state, &body).await?,
        "pull_request" => handle_pull_request(&state, &body).await?,
        "check_run" => handle_check_run(&state, &body).await?,
        other => WebhookResult {
            result: format!("ignored: unsupported event type {other}"),
            cascade_trigger: None,
        },
    };

    Ok(Json(WebhookResponse {
        received: true,
        event_type,
        result: result.result,
        cascade_trigger: result.cascade_trigger,
    }))
}

struct WebhookResult {
    result: String,
    cascade_trigger: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::ValidationFailure(e.to_string()))
}

async fn handle_push(state: &AppState, body: &[u8]) -> Result<WebhookResult, ApiError> {
    let payload: PushPayload = parse_body(body)?;
    let branch = payload
        .git_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(&payload.git_ref);
    let commit = match payload.head_commit.or_else(|| payload.commits.into_iter().last()) {
        Some(c) => c,
        None => {
            return Ok(WebhookResult {
                result: "no commits in push payload".to_string(),
                cascade_trigger: None,
            })
        }
    };

    let config = state.engine.config();
    let is_self_triggered = config.is_bot_author(&commit.author.name) || commit.message.contains("[Auto]");
    if is_self_triggered {
        return Ok(WebhookResult {
            result: "skipped: automated commit".to_string(),
            cascade_trigger: None,
        });
    }

    let touches_core_file = commit
        .added
        .iter()
        .chain(commit.modified.iter())
        .any(|path| config.is_core_file(path));

    let outcome = state
        .engine
        .review_commit(&payload.repository.full_name, branch, &commit.id, None)
        .await
        .map_err(ApiError::from)?;

    Ok(WebhookResult {
        result: review_outcome_label(&outcome),
        cascade_trigger: touches_core_file.then_some(commit.id),
    })
}

fn review_outcome_label(outcome: &ReviewOutcome) -> String {
    format!("{outcome:?}")
}

async fn handle_pull_request(state: &AppState, body: &[u8]) -> Result<WebhookResult, ApiError> {
    let payload: PullRequestPayload = parse_body(body)?;
    let pr = payload.pull_request;

    if payload.action == "closed" {
        let session = state.engine.registry().read(|s| {
            s.latest_active_session_for_branch(&payload.repository.full_name, &pr.head.name)
                .cloned()
        });
        let Some(session) = session else {
            return Ok(WebhookResult {
                result: "no active session for branch".to_string(),
                cascade_trigger: None,
            });
        };
        state
            .engine
            .on_pull_request_closed(&session.id, pr.merged, pr.html_url.as_deref())
            .map_err(ApiError::from)?;
        return Ok(WebhookResult {
            result: if pr.merged { "merged".to_string() } else { "closed without merge".to_string() },
            cascade_trigger: None,
        });
    }

    if matches!(payload.action.as_str(), "opened" | "synchronize" | "reopened") && !pr.head.sha.is_empty() {
        let outcome = state
            .engine
            .review_commit(&payload.repository.full_name, &pr.head.name, &pr.head.sha, Some(pr.number))
            .await
            .map_err(ApiError::from)?;
        return Ok(WebhookResult {
            result: review_outcome_label(&outcome),
            cascade_trigger: None,
        });
    }

    Ok(WebhookResult {
        result: format!("ignored: pull_request action {}", payload.action),
        cascade_trigger: None,
    })
}

async fn handle_check_run(state: &AppState, body: &[u8]) -> Result<WebhookResult, ApiError> {
    let payload: CheckRunPayload = parse_body(body)?;
    let Some(branch) = payload.check_run.head_branch else {
        return Ok(WebhookResult {
            result: "ignored: no head branch on check_run".to_string(),
            cascade_trigger: None,
        });
    };
    let session = state.engine.registry().read(|s| {
        s.latest_active_session_for_branch(&payload.repository.full_name, &branch).cloned()
    });
    let Some(session) = session else {
        return Ok(WebhookResult {
            result: "no active session for branch".to_string(),
            cascade_trigger: None,
        });
    };

    let outcome = match payload.check_run.conclusion.as_deref() {
        Some("success") => CiOutcome::Success,
        Some("timed_out") => CiOutcome::Timeout,
        Some(_) => CiOutcome::Failure,
        None => {
            return Ok(WebhookResult {
                result: "ignored: check_run still in progress".to_string(),
                cascade_trigger: None,
            })
        }
    };

    let result = state
        .engine
        .on_ci_check(&session.id, &payload.check_run.name, outcome, None)
        .await
        .map_err(ApiError::from)?;

    Ok(WebhookResult {
        result: ci_result_label(&result),
        cascade_trigger: None,
    })
}

fn ci_result_label(result: &CiCheckResult) -> String {
    format!("{result:?}")
}
