// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Agent Provider interface: the external service that actually runs
//! AI coding agents and produces change proposals.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub prompt: String,
    pub source_repo: String,
    pub starting_branch: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAgent {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentStatus {
    Planning,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl AgentStatus {
    /// §4.3 polling reconciliation: maps provider status codes onto the
    /// internal session status, or `None` for an unrecognised code (no-op).
    pub fn to_session_status(self) -> Option<relay_core::session::SessionStatus> {
        use relay_core::session::SessionStatus;
        match self {
            AgentStatus::Planning | AgentStatus::Running => Some(SessionStatus::Executing),
            AgentStatus::Completed => Some(SessionStatus::Completed),
            AgentStatus::Failed | AgentStatus::Cancelled => Some(SessionStatus::Failed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatusReport {
    pub status: AgentStatus,
    pub url: Option<String>,
    pub change_proposal_url: Option<String>,
}

#[async_trait]
pub trait AgentProvider: Send + Sync {
    async fn create_agent(&self, req: CreateAgentRequest) -> Result<CreatedAgent, ProviderError>;
    async fn get_agent(&self, id: &str) -> Result<AgentStatusReport, ProviderError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeAgentProvider {
        next_id: Mutex<u64>,
        reports: Mutex<HashMap<String, AgentStatusReport>>,
        reject_all: Mutex<bool>,
    }

    impl FakeAgentProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reject_all_creates(&self) {
            *self.reject_all.lock() = true;
        }

        pub fn set_status(&self, id: &str, report: AgentStatusReport) {
            self.reports.lock().insert(id.to_string(), report);
        }
    }

    #[async_trait]
    impl AgentProvider for FakeAgentProvider {
        async fn create_agent(&self, _req: CreateAgentRequest) -> Result<CreatedAgent, ProviderError> {
            if *self.reject_all.lock() {
                return Err(ProviderError::Http("agent creation rejected".to_string()));
            }
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            let id = format!("agent-{next_id}");
            self.reports.lock().insert(
                id.clone(),
                AgentStatusReport {
                    status: AgentStatus::Planning,
                    url: Some(format!("https://agents.example.com/{id}")),
                    change_proposal_url: None,
                },
            );
            Ok(CreatedAgent {
                url: format!("https://agents.example.com/{id}"),
                id,
            })
        }

        async fn get_agent(&self, id: &str) -> Result<AgentStatusReport, ProviderError> {
            self.reports
                .lock()
                .get(id)
                .cloned()
                .ok_or_else(|| ProviderError::Http(format!("unknown agent {id}")))
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
