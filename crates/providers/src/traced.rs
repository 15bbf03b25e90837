// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing decorators for the provider traits. Wrapping a provider in
//! [`Traced`] logs every outbound call and its latency without the
//! engine's call sites needing to know or care — the same separation the
//! teacher's adapter layer uses to keep instrumentation out of business
//! logic.

use crate::agent::{AgentProvider, AgentStatusReport, CreateAgentRequest, CreatedAgent};
use crate::auditor::{AuditReport, AuditorOracle, CascadeAnalysis, DecomposeInput, ReviewInput};
use crate::error::ProviderError;
use crate::vcs::VcsProvider;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

pub struct Traced<P> {
    inner: P,
    label: &'static str,
}

impl<P> Traced<P> {
    pub fn new(inner: P, label: &'static str) -> Self {
        Self { inner, label }
    }
}

#[async_trait]
impl<P: AgentProvider> AgentProvider for Traced<P> {
    async fn create_agent(&self, req: CreateAgentRequest) -> Result<CreatedAgent, ProviderError> {
        let started = Instant::now();
        let result = self.inner.create_agent(req).await;
        log_outcome(self.label, "create_agent", started, &result);
        result
    }

    async fn get_agent(&self, id: &str) -> Result<AgentStatusReport, ProviderError> {
        let started = Instant::now();
        let result = self.inner.get_agent(id).await;
        log_outcome(self.label, "get_agent", started, &result);
        result
    }
}

#[async_trait]
impl<P: VcsProvider> VcsProvider for Traced<P> {
    async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.inner.get_commit_diff(owner, repo, sha).await;
        log_outcome(self.label, "get_commit_diff", started, &result);
        result
    }

    async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.inner.get_pull_request_diff(owner, repo, number).await;
        log_outcome(self.label, "get_pull_request_diff", started, &result);
        result
    }

    async fn get_check_run_logs(
        &self,
        owner: &str,
        repo: &str,
        job_id: &str,
    ) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.inner.get_check_run_logs(owner, repo, job_id).await;
        log_outcome(self.label, "get_check_run_logs", started, &result);
        result
    }

    async fn post_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ProviderError> {
        let started = Instant::now();
        let result = self
            .inner
            .post_pull_request_comment(owner, repo, number, body)
            .await;
        log_outcome(self.label, "post_pull_request_comment", started, &result);
        result
    }

    async fn post_commit_comment(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        body: &str,
    ) -> Result<(), ProviderError> {
        let started = Instant::now();
        let result = self.inner.post_commit_comment(owner, repo, sha, body).await;
        log_outcome(self.label, "post_commit_comment", started, &result);
        result
    }
}

#[async_trait]
impl<P: AuditorOracle> AuditorOracle for Traced<P> {
    async fn review(&self, input: ReviewInput) -> Result<AuditReport, ProviderError> {
        let started = Instant::now();
        let result = self.inner.review(input).await;
        log_outcome(self.label, "review", started, &result);
        result
    }

    async fn decompose(&self, input: DecomposeInput) -> Result<CascadeAnalysis, ProviderError> {
        let started = Instant::now();
        let result = self.inner.decompose(input).await;
        log_outcome(self.label, "decompose", started, &result);
        result
    }
}

fn log_outcome<T>(label: &str, op: &str, started: Instant, result: &Result<T, ProviderError>) {
    let elapsed_ms = started.elapsed().as_millis();
    match result {
        Ok(_) => info!(provider = label, op, elapsed_ms, "provider call succeeded"),
        Err(e) => warn!(provider = label, op, elapsed_ms, error = %e, "provider call failed"),
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
