// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component C5: the Review & Remediation Loop (§4.5). Audits each
//! incoming diff against a goal's acceptance criteria and, on failure,
//! spawns a bounded-depth child repair session that inherits the parent's
//! locks in the same transaction as its own creation.

use crate::engine::Engine;
use crate::error::EngineError;
use relay_core::event::Event;
use relay_core::session::{Session, SessionId, SessionStatus};
use relay_core::{Clock, IdGen};
use relay_providers::auditor::ReviewInput;
use relay_providers::{AgentProvider, AuditorOracle, CreateAgentRequest, VcsProvider};
use relay_storage::Registry;

const LOG_EXCERPT_LIMIT: usize = 4_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    NoActiveSession,
    DuplicateCommitSkipped,
    EmptyDiffSkipped,
    Completed,
    RemediationSpawned { child_id: SessionId },
    DriftedMaxDepth,
}

fn split_owner_repo(source_repo: &str) -> Result<(&str, &str), EngineError> {
    source_repo
        .split_once('/')
        .ok_or_else(|| EngineError::InvalidConfig(format!("malformed source_repo: {source_repo}")))
}

fn compose_review_comment(report: &relay_providers::AuditReport) -> String {
    let mut comment = format!("Automated review ({:?} severity): {}", report.severity, report.summary);
    for finding in &report.findings {
        comment.push_str("\n- ");
        comment.push_str(finding);
    }
    comment
}

impl<Au, Ag, Vc, C, I> Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    /// The 10-step loop of §4.5, triggered by a VCS push or change-proposal
    /// event for a branch linked to an active session.
    pub async fn review_commit(
        &self,
        source_repo: &str,
        branch_name: &str,
        commit: &str,
        pr_number: Option<u64>,
    ) -> Result<ReviewOutcome, EngineError> {
        self.review_commit_inner(source_repo, branch_name, commit, pr_number, false).await
    }

    /// Re-runs the review even if `commit` is the session's last-reviewed
    /// commit, bypassing step 2's duplicate-commit guard. Used by
    /// `re_audit_goal`, where re-scoring the same commit on demand is the
    /// whole point rather than a redelivery to suppress.
    pub async fn review_commit_forced(
        &self,
        source_repo: &str,
        branch_name: &str,
        commit: &str,
        pr_number: Option<u64>,
    ) -> Result<ReviewOutcome, EngineError> {
        self.review_commit_inner(source_repo, branch_name, commit, pr_number, true).await
    }

    async fn review_commit_inner(
        &self,
        source_repo: &str,
        branch_name: &str,
        commit: &str,
        pr_number: Option<u64>,
        force: bool,
    ) -> Result<ReviewOutcome, EngineError> {
        // Step 1: locate the most recent non-terminal session for (repo, branch).
        let Some(session) = self
            .registry
            .read(|state| state.latest_active_session_for_branch(source_repo, branch_name).cloned())
        else {
            return Ok(ReviewOutcome::NoActiveSession);
        };

        // Step 2: duplicate-commit suppression keeps redelivery idempotent.
        if !force && session.is_duplicate_commit(commit) {
            return Ok(ReviewOutcome::DuplicateCommitSkipped);
        }

        // Step 3: fetch the diff.
        let (owner, repo) = split_owner_repo(source_repo)?;
        let diff = match pr_number {
            Some(n) => self.vcs.get_pull_request_diff(owner, repo, n).await?,
            None => self.vcs.get_commit_diff(owner, repo, commit).await?,
        };
        if diff.trim().is_empty() {
            return Ok(ReviewOutcome::EmptyDiffSkipped);
        }

        // Step 4: invoke the Auditor oracle.
        let goal = session.goal_id.as_ref().and_then(|id| self.registry.read_goal_by_id(id));
        let criteria = goal.as_ref().map(|g| g.criteria.clone()).unwrap_or_default();
        let report = self
            .auditor
            .review(ReviewInput {
                source_repo: source_repo.to_string(),
                branch_name: branch_name.to_string(),
                commit: commit.to_string(),
                criteria,
                diff,
            })
            .await?;

        let now_ms = self.now_ms();

        // Step 5: merge the assessment into the goal's criteria (idempotent, by id).
        if let Some(goal_id) = session.goal_id.clone() {
            self.registry.in_tx(|_state| {
                Ok((
                    (),
                    vec![Event::GoalCriteriaAssessed {
                        id: goal_id,
                        assessment: report.criteria_assessment.clone(),
                        at_ms: now_ms,
                    }],
                ))
            })?;
        }

        // Step 6: post a human-readable review comment.
        let comment = compose_review_comment(&report);
        match pr_number {
            Some(n) => self.vcs.post_pull_request_comment(owner, repo, n, &comment).await?,
            None => self.vcs.post_commit_comment(owner, repo, commit, &comment).await?,
        }

        // Step 7: determine failure.
        let failure = report.is_failure();

        if !failure {
            // Step 10.
            self.registry.in_tx(|_state| {
                Ok((
                    (),
                    vec![
                        Event::SessionCommitReviewed {
                            id: session.id.clone(),
                            commit: commit.to_string(),
                            at_ms: now_ms,
                        },
                        Event::SessionStatusChanged {
                            id: session.id.clone(),
                            status: SessionStatus::Completed,
                            last_error: None,
                            at_ms: now_ms,
                        },
                        Event::LockReleased {
                            session_id: session.id.clone(),
                            at_ms: now_ms,
                        },
                    ],
                ))
            })?;
            return Ok(ReviewOutcome::Completed);
        }

        if session.at_max_remediation_depth() {
            // Step 9.
            self.registry.in_tx(|_state| {
                Ok((
                    (),
                    vec![Event::SessionCommitReviewed {
                        id: session.id.clone(),
                        commit: commit.to_string(),
                        at_ms: now_ms,
                    }],
                ))
            })?;
            self.fail_and_drift_goal(&session, "remediation depth exhausted, manual intervention required")?;
            return Ok(ReviewOutcome::DriftedMaxDepth);
        }

        // Step 8: spawn a bounded-depth child repair session.
        let prompt = remediation_prompt_from_review(&report);
        let child = spawn_remediation_child(
            &self.registry,
            &self.ids,
            &self.clock,
            &session,
            Some(commit),
            "review found unmet acceptance criteria",
        )?;
        dispatch_remediation_agent(&self.registry, &self.agents, &self.clock, &child, &prompt).await?;
        Ok(ReviewOutcome::RemediationSpawned { child_id: child.id })
    }
}

/// §4.5 "Child session spawn (atomic handoff)": one transaction creates the
/// child at `parent.remediation_depth + 1` and transfers every lock the
/// parent holds, so there is never a window where the files are unlocked.
/// Also marks the parent *failed* (and records the triggering commit, if
/// any) in the same transaction — both sides of the handoff are visible to
/// readers atomically.
pub(crate) fn spawn_remediation_child<C: Clock, I: IdGen>(
    registry: &Registry,
    ids: &I,
    clock: &C,
    parent: &Session,
    parent_reviewed_commit: Option<&str>,
    parent_failure_reason: impl Into<String>,
) -> Result<Session, EngineError> {
    let now_ms = clock.epoch_ms();
    let reason = parent_failure_reason.into();
    let child_id = ids.session_id();
    let spec = parent.child_spec(None);
    let child = Session::new(child_id.clone(), spec.clone(), now_ms)?;

    registry.in_tx(|_state| {
        let mut events = vec![
            Event::SessionCreated {
                id: child_id.clone(),
                spec: spec.clone(),
                at_ms: now_ms,
            },
            Event::LockTransferred {
                from: parent.id.clone(),
                to: child_id.clone(),
                at_ms: now_ms,
            },
            Event::SessionStatusChanged {
                id: parent.id.clone(),
                status: SessionStatus::Failed,
                last_error: Some(reason.clone()),
                at_ms: now_ms,
            },
        ];
        if let Some(commit) = parent_reviewed_commit {
            events.push(Event::SessionCommitReviewed {
                id: parent.id.clone(),
                commit: commit.to_string(),
                at_ms: now_ms,
            });
        }
        Ok((child.clone(), events))
    })?;
    Ok(child)
}

/// Requests the Agent Provider to start an agent for a freshly spawned
/// remediation child. A dispatch error marks the child *failed* without
/// rolling back its inherited locks — see DESIGN.md for the documented
/// operator procedure (§9 Open Question 2).
pub(crate) async fn dispatch_remediation_agent<Ag: AgentProvider, C: Clock>(
    registry: &Registry,
    agents: &Ag,
    clock: &C,
    child: &Session,
    prompt: &str,
) -> Result<(), EngineError> {
    let now_ms = clock.epoch_ms();
    let result = agents
        .create_agent(CreateAgentRequest {
            prompt: prompt.to_string(),
            source_repo: child.source_repo.clone(),
            starting_branch: child.branch_name.clone(),
            context: None,
        })
        .await;

    let event = match result {
        Ok(created) => Event::SessionAgentAccepted {
            id: child.id.clone(),
            external_agent_id: created.id,
            at_ms: now_ms,
        },
        Err(e) => Event::SessionStatusChanged {
            id: child.id.clone(),
            status: SessionStatus::Failed,
            last_error: Some(e.to_string()),
            at_ms: now_ms,
        },
    };
    registry.in_tx(|_state| Ok(((), vec![event])))?;
    Ok(())
}

pub(crate) fn remediation_prompt_from_ci(session: &Session, log_excerpt: Option<&str>) -> String {
    match log_excerpt {
        Some(log) => format!(
            "CI failed on branch {}. Log excerpt:\n{}",
            session.branch_name,
            truncate(log, LOG_EXCERPT_LIMIT)
        ),
        None => format!("CI failed on branch {}.", session.branch_name),
    }
}

fn remediation_prompt_from_review(report: &relay_providers::AuditReport) -> String {
    let mut prompt = format!("Address the following review findings: {}", report.summary);
    for finding in &report.findings {
        prompt.push_str("\n- ");
        prompt.push_str(finding);
    }
    if let Some(fix) = &report.recommended_fix_prompt {
        prompt.push_str("\n\nSuggested fix:\n");
        prompt.push_str(fix);
    }
    prompt
}

fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        s
    } else {
        let boundary = s
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take_while(|&i| i <= limit)
            .last()
            .unwrap_or(0);
        &s[..boundary]
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
