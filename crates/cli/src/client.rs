// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for `relayd` commands.

use relay_server::dto::{
    CascadeAnalyzeRequest, CascadeResponseDto, CreateGoalRequest, GoalDto, ListGoalsResponse,
    ListLocksResponse, ListSessionsResponse, OrchestratorBatchRequest, OrchestratorBatchResponse,
    PurgeLocksResponse, SyncBatchRequest, SyncBatchResponse, SyncRequest, SyncResponse,
    TerminateSessionResponse, UpdateGoalRequest,
};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

/// Thin wrapper over `relayd`'s HTTP surface (§6 route table).
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReAuditResponse {
    pub outcome: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn ok_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json::<T>().await?)
        } else {
            Err(Self::api_error(status, resp).await)
        }
    }

    async fn ok_empty(resp: Response) -> Result<(), ClientError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::api_error(status, resp).await)
        }
    }

    async fn api_error(status: StatusCode, resp: Response) -> ClientError {
        let body = resp.text().await.unwrap_or_default();
        ClientError::Api { status, message: extract_error_message(&body) }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn list_goals(&self) -> Result<ListGoalsResponse, ClientError> {
        let resp = self.http.get(self.url("/goals")).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn get_goal(&self, id: &str) -> Result<GoalDto, ClientError> {
        let resp = self.http.get(self.url(&format!("/goals/{id}"))).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn create_goal(&self, req: &CreateGoalRequest) -> Result<GoalDto, ClientError> {
        let resp = self.http.post(self.url("/goals")).json(req).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn update_goal(&self, id: &str, req: &UpdateGoalRequest) -> Result<GoalDto, ClientError> {
        let resp = self.http.patch(self.url(&format!("/goals/{id}"))).json(req).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn delete_goal(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/goals/{id}"))).send().await?;
        Self::ok_empty(resp).await
    }

    pub async fn re_audit_goal(&self, id: &str) -> Result<ReAuditResponse, ClientError> {
        let resp = self.http.post(self.url(&format!("/goals/{id}/re-audit"))).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn list_sessions(&self) -> Result<ListSessionsResponse, ClientError> {
        let resp = self.http.get(self.url("/sessions")).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn terminate_session(&self, id: &str) -> Result<TerminateSessionResponse, ClientError> {
        let resp = self.http.post(self.url(&format!("/sessions/{id}/terminate"))).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn list_locks(&self) -> Result<ListLocksResponse, ClientError> {
        let resp = self.http.get(self.url("/locks")).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn purge_locks(&self) -> Result<PurgeLocksResponse, ClientError> {
        let resp = self.http.delete(self.url("/locks")).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn cascade_analyze(&self, req: &CascadeAnalyzeRequest) -> Result<CascadeResponseDto, ClientError> {
        let resp = self.http.post(self.url("/cascade/analyze")).json(req).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn orchestrator_batch(
        &self,
        req: &OrchestratorBatchRequest,
    ) -> Result<OrchestratorBatchResponse, ClientError> {
        let resp = self.http.post(self.url("/orchestrator/batch")).json(req).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn sync(&self, req: &SyncRequest) -> Result<SyncResponse, ClientError> {
        let resp = self.http.post(self.url("/orchestrator/sync")).json(req).send().await?;
        Self::ok_json(resp).await
    }

    pub async fn sync_batch(&self, req: &SyncBatchRequest) -> Result<SyncBatchResponse, ClientError> {
        let resp = self.http.post(self.url("/orchestrator/sync-batch")).json(req).send().await?;
        Self::ok_json(resp).await
    }
}

/// Pulls a human-readable message out of an error response body: the
/// `error` field for validation/not-found/internal errors, the `conflicts`
/// array for 409s, or the raw body if it isn't JSON at all.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.as_str().map(str::to_string))
                .or_else(|| v.get("conflicts").map(|c| c.to_string()))
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
