// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Auditor oracle interface (§9 design note: "interfaces, not
//! clients"). This is the narrow seam the Review & Remediation Loop (C5)
//! and Cascade Engine (C4) talk to; the real implementation is an
//! LLM-backed service out of scope for this core, reached over HTTP.

use crate::error::ProviderError;
use async_trait::async_trait;
use relay_core::goal::{AcceptanceCriterion, CriterionAssessment};
use relay_core::{Priority, RepairJob};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Minor,
    Major,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInput {
    pub source_repo: String,
    pub branch_name: String,
    pub commit: String,
    pub criteria: Vec<AcceptanceCriterion>,
    pub diff: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub severity: Severity,
    pub summary: String,
    pub findings: Vec<String>,
    pub recommended_fix_prompt: Option<String>,
    pub criteria_assessment: HashMap<String, CriterionAssessment>,
}

impl AuditReport {
    /// §4.5 step 7: failure iff any assessed criterion is unmet, or no
    /// criterion was assessed and severity is major.
    pub fn is_failure(&self) -> bool {
        let any_unmet = self.criteria_assessment.values().any(|a| !a.met);
        any_unmet || (self.criteria_assessment.is_empty() && self.severity == Severity::Major)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreFileDiff {
    pub path: String,
    pub diff: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposeInput {
    pub core_file_diffs: Vec<CoreFileDiff>,
    pub changed_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeAnalysis {
    pub is_cascade: bool,
    pub core_files_changed: Vec<String>,
    pub downstream_files: Vec<String>,
    pub repair_jobs: Vec<RepairJob>,
    pub summary: String,
    pub confidence: f64,
}

#[async_trait]
pub trait AuditorOracle: Send + Sync {
    async fn review(&self, input: ReviewInput) -> Result<AuditReport, ProviderError>;
    async fn decompose(&self, input: DecomposeInput) -> Result<CascadeAnalysis, ProviderError>;
}

/// Deterministic test double. Configured with canned responses so engine
/// tests can exercise every branch of the review/decompose algorithms
/// without a real LLM in the loop.
#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Default)]
    pub struct FakeAuditorOracle {
        reviews: Mutex<VecDeque<Result<AuditReport, ProviderError>>>,
        decompositions: Mutex<VecDeque<Result<CascadeAnalysis, ProviderError>>>,
    }

    impl FakeAuditorOracle {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_review(&self, report: Result<AuditReport, ProviderError>) {
            self.reviews.lock().push_back(report);
        }

        pub fn push_decomposition(&self, analysis: Result<CascadeAnalysis, ProviderError>) {
            self.decompositions.lock().push_back(analysis);
        }
    }

    #[async_trait]
    impl AuditorOracle for FakeAuditorOracle {
        async fn review(&self, _input: ReviewInput) -> Result<AuditReport, ProviderError> {
            self.reviews
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(all_criteria_pass()))
        }

        async fn decompose(&self, _input: DecomposeInput) -> Result<CascadeAnalysis, ProviderError> {
            self.decompositions
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(no_cascade()))
        }
    }

    pub fn all_criteria_pass() -> AuditReport {
        AuditReport {
            severity: Severity::None,
            summary: "all criteria satisfied".to_string(),
            findings: vec![],
            recommended_fix_prompt: None,
            criteria_assessment: HashMap::new(),
        }
    }

    pub fn no_cascade() -> CascadeAnalysis {
        CascadeAnalysis {
            is_cascade: false,
            core_files_changed: vec![],
            downstream_files: vec![],
            repair_jobs: vec![],
            summary: "no downstream impact".to_string(),
            confidence: 1.0,
        }
    }

    pub fn cascade_with_jobs(jobs: Vec<(&str, &[&str])>, confidence: f64) -> CascadeAnalysis {
        let repair_jobs = jobs
            .into_iter()
            .map(|(id, files)| RepairJob {
                id: id.to_string(),
                files: files.iter().map(|f| f.to_string()).collect(),
                prompt: format!("repair for {id}"),
                priority: Priority::Medium,
                estimated_impact: "medium".to_string(),
            })
            .collect();
        CascadeAnalysis {
            is_cascade: true,
            core_files_changed: vec![],
            downstream_files: vec![],
            repair_jobs,
            summary: "cascading change".to_string(),
            confidence,
        }
    }
}

#[cfg(test)]
#[path = "auditor_tests.rs"]
mod tests;
