// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real `reqwest`-backed implementations of the three provider traits.
//! Each talks to one external base URL with a single API-key header; wire
//! shapes are translated into the domain types at the edge so nothing
//! downstream of `relay-providers` ever sees provider-specific JSON.

use crate::agent::{AgentProvider, AgentStatus, AgentStatusReport, CreateAgentRequest, CreatedAgent};
use crate::auditor::{AuditReport, AuditorOracle, CascadeAnalysis, DecomposeInput, ReviewInput};
use crate::error::ProviderError;
use crate::vcs::VcsProvider;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

fn map_reqwest_err(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Http(err.to_string())
    }
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ProviderError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let reset_at_ms = resp
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        return Err(ProviderError::RateLimited { reset_at_ms });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Http(format!("{status}: {body}")));
    }
    resp.json::<T>()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// Shared shape of every client: one base URL, one bearer token.
struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub struct HttpAgentProvider {
    client: ApiClient,
}

impl HttpAgentProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: ApiClient::new(base_url, api_key),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetAgentWire {
    status: AgentStatus,
    url: Option<String>,
    outputs: Option<GetAgentOutputsWire>,
}

#[derive(Debug, Deserialize)]
struct GetAgentOutputsWire {
    change_proposal: Option<ChangeProposalWire>,
}

#[derive(Debug, Deserialize)]
struct ChangeProposalWire {
    url: Option<String>,
}

impl From<GetAgentWire> for AgentStatusReport {
    fn from(wire: GetAgentWire) -> Self {
        let change_proposal_url = wire
            .outputs
            .and_then(|o| o.change_proposal)
            .and_then(|c| c.url);
        Self {
            status: wire.status,
            url: wire.url,
            change_proposal_url,
        }
    }
}

#[async_trait]
impl AgentProvider for HttpAgentProvider {
    async fn create_agent(&self, req: CreateAgentRequest) -> Result<CreatedAgent, ProviderError> {
        let resp = self
            .client
            .http
            .post(self.client.url("/agents"))
            .bearer_auth(&self.client.api_key)
            .json(&req)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response(resp).await
    }

    async fn get_agent(&self, id: &str) -> Result<AgentStatusReport, ProviderError> {
        let resp = self
            .client
            .http
            .get(self.client.url(&format!("/agents/{id}")))
            .bearer_auth(&self.client.api_key)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response::<GetAgentWire>(resp).await.map(Into::into)
    }
}

pub struct HttpVcsProvider {
    client: ApiClient,
}

impl HttpVcsProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: ApiClient::new(base_url, api_key),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiffWire {
    diff: String,
}

#[derive(Debug, Serialize)]
struct CommentWire<'a> {
    body: &'a str,
}

#[async_trait]
impl VcsProvider for HttpVcsProvider {
    async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<String, ProviderError> {
        let resp = self
            .client
            .http
            .get(self.client.url(&format!("/repos/{owner}/{repo}/commits/{sha}/diff")))
            .bearer_auth(&self.client.api_key)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response::<DiffWire>(resp).await.map(|w| w.diff)
    }

    async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ProviderError> {
        let resp = self
            .client
            .http
            .get(self.client.url(&format!("/repos/{owner}/{repo}/pulls/{number}/diff")))
            .bearer_auth(&self.client.api_key)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response::<DiffWire>(resp).await.map(|w| w.diff)
    }

    async fn get_check_run_logs(
        &self,
        owner: &str,
        repo: &str,
        job_id: &str,
    ) -> Result<String, ProviderError> {
        let resp = self
            .client
            .http
            .get(self.client.url(&format!("/repos/{owner}/{repo}/check-runs/{job_id}/logs")))
            .bearer_auth(&self.client.api_key)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        resp.text().await.map_err(map_reqwest_err)
    }

    async fn post_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ProviderError> {
        let resp = self
            .client
            .http
            .post(self.client.url(&format!("/repos/{owner}/{repo}/pulls/{number}/comments")))
            .bearer_auth(&self.client.api_key)
            .json(&CommentWire { body })
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response::<serde_json::Value>(resp).await.map(|_| ())
    }

    async fn post_commit_comment(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        body: &str,
    ) -> Result<(), ProviderError> {
        let resp = self
            .client
            .http
            .post(self.client.url(&format!("/repos/{owner}/{repo}/commits/{sha}/comments")))
            .bearer_auth(&self.client.api_key)
            .json(&CommentWire { body })
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response::<serde_json::Value>(resp).await.map(|_| ())
    }
}

pub struct HttpAuditorOracle {
    client: ApiClient,
}

impl HttpAuditorOracle {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: ApiClient::new(base_url, api_key),
        }
    }
}

#[async_trait]
impl AuditorOracle for HttpAuditorOracle {
    async fn review(&self, input: ReviewInput) -> Result<AuditReport, ProviderError> {
        let resp = self
            .client
            .http
            .post(self.client.url("/review"))
            .bearer_auth(&self.client.api_key)
            .json(&input)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response(resp).await
    }

    async fn decompose(&self, input: DecomposeInput) -> Result<CascadeAnalysis, ProviderError> {
        let resp = self
            .client
            .http
            .post(self.client.url("/decompose"))
            .bearer_auth(&self.client.api_key)
            .json(&input)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        parse_response(resp).await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
