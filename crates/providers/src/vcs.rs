// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The VCS Provider interface: the external version-control host. Serves
//! diffs and CI logs, and accepts review comments.

use crate::error::ProviderError;
use async_trait::async_trait;

#[async_trait]
pub trait VcsProvider: Send + Sync {
    async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<String, ProviderError>;
    async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, ProviderError>;
    async fn get_check_run_logs(
        &self,
        owner: &str,
        repo: &str,
        job_id: &str,
    ) -> Result<String, ProviderError>;
    async fn post_pull_request_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ProviderError>;
    async fn post_commit_comment(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        body: &str,
    ) -> Result<(), ProviderError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct FakeVcsProvider {
        pub commit_diff: Mutex<String>,
        pub pr_diff: Mutex<String>,
        pub check_run_logs: Mutex<String>,
        pub posted_comments: Mutex<Vec<String>>,
    }

    impl FakeVcsProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_commit_diff(self, diff: impl Into<String>) -> Self {
            *self.commit_diff.lock() = diff.into();
            self
        }

        pub fn with_pr_diff(self, diff: impl Into<String>) -> Self {
            *self.pr_diff.lock() = diff.into();
            self
        }

        pub fn posted_comments(&self) -> Vec<String> {
            self.posted_comments.lock().clone()
        }
    }

    #[async_trait]
    impl VcsProvider for FakeVcsProvider {
        async fn get_commit_diff(&self, _owner: &str, _repo: &str, _sha: &str) -> Result<String, ProviderError> {
            Ok(self.commit_diff.lock().clone())
        }

        async fn get_pull_request_diff(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
        ) -> Result<String, ProviderError> {
            Ok(self.pr_diff.lock().clone())
        }

        async fn get_check_run_logs(
            &self,
            _owner: &str,
            _repo: &str,
            _job_id: &str,
        ) -> Result<String, ProviderError> {
            Ok(self.check_run_logs.lock().clone())
        }

        async fn post_pull_request_comment(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
            body: &str,
        ) -> Result<(), ProviderError> {
            self.posted_comments.lock().push(body.to_string());
            Ok(())
        }

        async fn post_commit_comment(
            &self,
            _owner: &str,
            _repo: &str,
            _sha: &str,
            body: &str,
        ) -> Result<(), ProviderError> {
            self.posted_comments.lock().push(body.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "vcs_tests.rs"]
mod tests;
