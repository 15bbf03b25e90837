// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Goal` entity: a standing architectural objective made of stable
//! acceptance criteria, tracked against the review artifacts (merged or
//! pending change proposals) produced in service of it.

use crate::error::DomainError;
use crate::id::GoalId;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Backlog,
    InProgress,
    Completed,
    /// Terminal-failure: remediation was exhausted without meeting criteria.
    Drifted,
}

impl GoalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Drifted)
    }
}

/// A single testable requirement of a goal, assessed per-diff by the
/// Auditor oracle. `id` is stable for the goal's lifetime (invariant G1),
/// which is what makes auditor updates idempotent: the same id is
/// overwritten in place rather than appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub id: String,
    pub text: String,
    pub met: bool,
    pub reasoning: Option<String>,
    pub evidence_files: Vec<String>,
}

impl AcceptanceCriterion {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            met: false,
            reasoning: None,
            evidence_files: Vec::new(),
        }
    }
}

/// The per-criterion verdict returned by `AuditorOracle::review`, keyed by
/// criterion id so it can be merged in without touching unrelated criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionAssessment {
    pub met: bool,
    pub reasoning: Option<String>,
    pub evidence_files: Vec<String>,
}

/// A merged/pending change proposal produced in service of a goal.
/// Deduplicated on `(url, external_agent_id)` so sync-loop redelivery
/// doesn't grow the set unboundedly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewArtifact {
    pub url: String,
    pub session_id: SessionId,
    pub external_agent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub criteria: Vec<AcceptanceCriterion>,
    pub review_artifacts: Vec<ReviewArtifact>,
    pub status: GoalStatus,
    /// Synthesized for a cascade dispatched without an explicit goal id
    /// (its criteria are the repair prompts themselves). See DESIGN.md for
    /// the lifecycle decision on synthetic goals.
    pub synthetic: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Goal {
    pub fn new(
        id: GoalId,
        title: impl Into<String>,
        description: impl Into<String>,
        criteria: Vec<AcceptanceCriterion>,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            criteria,
            review_artifacts: Vec::new(),
            status: GoalStatus::Backlog,
            synthetic: false,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn new_synthetic(id: GoalId, repair_job_prompts: &[String], now_ms: i64) -> Self {
        let criteria = repair_job_prompts
            .iter()
            .enumerate()
            .map(|(i, prompt)| AcceptanceCriterion::new(format!("synthetic-{i}"), prompt.clone()))
            .collect();
        let mut goal = Self::new(id, "synthetic remediation goal", "", criteria, now_ms);
        goal.synthetic = true;
        goal
    }

    /// Overwrites `met`/`reasoning`/`evidenceFiles` for the criterion ids
    /// present in `assessment`, leaving every other criterion untouched.
    /// Unknown ids are ignored rather than erroring: the Auditor may assess
    /// criteria concurrently added or removed by an operator edit.
    pub fn merge_criteria_assessment(
        &mut self,
        assessment: &std::collections::HashMap<String, CriterionAssessment>,
        now_ms: i64,
    ) {
        let mut touched = false;
        for criterion in &mut self.criteria {
            if let Some(verdict) = assessment.get(&criterion.id) {
                criterion.met = verdict.met;
                criterion.reasoning = verdict.reasoning.clone();
                criterion.evidence_files = verdict.evidence_files.clone();
                touched = true;
            }
        }
        if touched {
            self.updated_at_ms = now_ms;
        }
    }

    pub fn criterion(&self, id: &str) -> Result<&AcceptanceCriterion, DomainError> {
        self.criteria
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::UnknownCriterion(id.to_string()))
    }

    pub fn all_criteria_met(&self) -> bool {
        self.criteria.iter().all(|c| c.met)
    }

    /// Idempotent: a redelivered `(url, externalAgentId)` pair is a no-op.
    pub fn add_review_artifact(&mut self, artifact: ReviewArtifact, now_ms: i64) {
        let already_present = self.review_artifacts.iter().any(|a| {
            a.url == artifact.url && a.external_agent_id == artifact.external_agent_id
        });
        if !already_present {
            self.review_artifacts.push(artifact);
            self.updated_at_ms = now_ms;
        }
    }

    pub fn set_status(&mut self, status: GoalStatus, now_ms: i64) {
        if self.status != status {
            self.status = status;
            self.updated_at_ms = now_ms;
        }
    }

    /// Full-rewrite operator edit (invariant G1 is the caller's
    /// responsibility: criteria ids should be carried over for any
    /// criterion that isn't newly added).
    pub fn apply_update(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        criteria: Vec<AcceptanceCriterion>,
        now_ms: i64,
    ) {
        self.title = title.into();
        self.description = description.into();
        self.criteria = criteria;
        self.updated_at_ms = now_ms;
    }
}

#[cfg(test)]
#[path = "goal_tests.rs"]
mod tests;
