// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters to the three external collaborators the control plane depends
//! on: the Auditor oracle, the Agent Provider, and the VCS Provider. Each
//! is a narrow async trait with a deterministic fake behind
//! `test-support`, and each can be wrapped in [`traced::Traced`] for
//! outbound-call logging.

pub mod agent;
pub mod auditor;
pub mod error;
pub mod http;
pub mod traced;
pub mod vcs;

pub use agent::{AgentProvider, AgentStatus, AgentStatusReport, CreateAgentRequest, CreatedAgent};
pub use auditor::{AuditReport, AuditorOracle, CascadeAnalysis, CoreFileDiff, DecomposeInput, ReviewInput, Severity};
pub use error::ProviderError;
pub use http::{HttpAgentProvider, HttpAuditorOracle, HttpVcsProvider};
pub use traced::Traced;
pub use vcs::VcsProvider;
