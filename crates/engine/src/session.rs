// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component C3: the Session Lifecycle state machine (§4.3). Every
//! transition in the table goes through one of the methods below, each a
//! single `Registry::in_tx` call so concurrent webhook deliveries for the
//! same session serialize on the state lock rather than racing.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::review;
use relay_core::event::Event;
use relay_core::goal::ReviewArtifact;
use relay_core::session::{Session, SessionId, SessionStatus};
use relay_core::{Clock, IdGen};
use relay_providers::{AgentProvider, AuditorOracle, VcsProvider};

/// §4.3 CI signal classification: only a primary pipeline's result drives
/// a transition. Everything else is logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiOutcome {
    Success,
    Failure,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiCheckResult {
    Ignored,
    EnteredVerifying,
    FailedRemediationSpawned { child_id: SessionId },
    FailedAtMaxDepth,
    NoActiveSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NoOp,
    Transitioned(SessionStatus),
    UnknownSession,
}

impl<Au, Ag, Vc, C, I> Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    /// `queued --Agent Provider accepts--> executing`.
    pub fn on_agent_accepted(
        &self,
        session_id: &SessionId,
        external_agent_id: impl Into<String>,
    ) -> Result<(), EngineError> {
        let now_ms = self.now_ms();
        let external_agent_id = external_agent_id.into();
        self.registry.in_tx(|state| {
            let session = state
                .session(session_id)
                .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))
                .map_err(|e| relay_storage::RegistryError::Domain(e.to_string()))?;
            if session.is_terminal() {
                return Ok(((), Vec::new()));
            }
            Ok((
                (),
                vec![Event::SessionAgentAccepted {
                    id: session_id.clone(),
                    external_agent_id,
                    at_ms: now_ms,
                }],
            ))
        })?;
        Ok(())
    }

    /// `queued --Agent Provider rejects--> failed`, releasing any locks.
    pub fn on_agent_rejected(
        &self,
        session_id: &SessionId,
        reason: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.fail_and_release(session_id, reason)
    }

    /// `executing/verifying --CI check_run failure or timeout--> failed,
    /// spawn child repair`. Non-primary pipelines are ignored entirely.
    pub async fn on_ci_check(
        &self,
        session_id: &SessionId,
        pipeline_name: &str,
        outcome: CiOutcome,
        ci_log_excerpt: Option<&str>,
    ) -> Result<CiCheckResult, EngineError> {
        if !self.config.is_primary_pipeline(pipeline_name) {
            return Ok(CiCheckResult::Ignored);
        }
        let Some(session) = self.registry.read_session_by_id(session_id) else {
            return Ok(CiCheckResult::NoActiveSession);
        };
        if session.is_terminal() {
            return Ok(CiCheckResult::Ignored);
        }

        match outcome {
            CiOutcome::Success => {
                let now_ms = self.now_ms();
                self.registry.in_tx(|_state| {
                    Ok((
                        (),
                        vec![Event::SessionStatusChanged {
                            id: session_id.clone(),
                            status: SessionStatus::Verifying,
                            last_error: None,
                            at_ms: now_ms,
                        }],
                    ))
                })?;
                Ok(CiCheckResult::EnteredVerifying)
            }
            CiOutcome::Failure | CiOutcome::Timeout => {
                let reason = match outcome {
                    CiOutcome::Timeout => format!("CI timeout on pipeline {pipeline_name}"),
                    _ => format!("CI failure on pipeline {pipeline_name}"),
                };
                if session.at_max_remediation_depth() {
                    self.fail_and_drift_goal(&session, reason)?;
                    return Ok(CiCheckResult::FailedAtMaxDepth);
                }
                let prompt = review::remediation_prompt_from_ci(&session, ci_log_excerpt);
                let child = review::spawn_remediation_child(
                    &self.registry,
                    &self.ids,
                    &self.clock,
                    &session,
                    None,
                    reason,
                )?;
                review::dispatch_remediation_agent(
                    &self.registry,
                    &self.agents,
                    &self.clock,
                    &child,
                    &prompt,
                )
                .await?;
                Ok(CiCheckResult::FailedRemediationSpawned {
                    child_id: child.id,
                })
            }
        }
    }

    /// `verifying/queued/executing --change-proposal closed--> completed|failed`.
    pub fn on_pull_request_closed(
        &self,
        session_id: &SessionId,
        merged: bool,
        pr_url: Option<&str>,
    ) -> Result<(), EngineError> {
        let now_ms = self.now_ms();
        if merged {
            let session = self
                .registry
                .read_session_by_id(session_id)
                .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))?;
            self.registry.in_tx(|_state| {
                let mut events = vec![
                    Event::SessionStatusChanged {
                        id: session_id.clone(),
                        status: SessionStatus::Completed,
                        last_error: None,
                        at_ms: now_ms,
                    },
                    Event::LockReleased {
                        session_id: session_id.clone(),
                        at_ms: now_ms,
                    },
                ];
                if let (Some(goal_id), Some(url)) = (session.goal_id.clone(), pr_url) {
                    events.push(Event::GoalReviewArtifactAdded {
                        id: goal_id,
                        artifact: ReviewArtifact {
                            url: url.to_string(),
                            session_id: session_id.clone(),
                            external_agent_id: session.external_agent_id.clone(),
                        },
                        at_ms: now_ms,
                    });
                }
                Ok(((), events))
            })?;
            Ok(())
        } else {
            self.fail_and_release(session_id, "pull request closed without merge")
        }
    }

    /// Polling reconciliation (§4.3): maps Agent Provider status to the
    /// internal state; on completion with a change proposal, appends it to
    /// the parent goal's review artifacts, deduplicated by `(url,
    /// externalAgentId)`.
    pub async fn sync(&self, session_id: &SessionId) -> Result<SyncOutcome, EngineError> {
        let Some(session) = self.registry.read_session_by_id(session_id) else {
            return Ok(SyncOutcome::UnknownSession);
        };
        if session.is_terminal() {
            return Ok(SyncOutcome::NoOp);
        }
        let Some(external_agent_id) = session.external_agent_id.clone() else {
            return Ok(SyncOutcome::NoOp);
        };

        let report = self.agents.get_agent(&external_agent_id).await?;
        let Some(new_status) = report.status.to_session_status() else {
            return Ok(SyncOutcome::NoOp);
        };

        let now_ms = self.now_ms();
        let change_proposal_url = report.change_proposal_url.clone();
        self.registry.in_tx(|_state| {
            let mut events = vec![
                Event::SessionSynced {
                    id: session_id.clone(),
                    at_ms: now_ms,
                },
                Event::SessionStatusChanged {
                    id: session_id.clone(),
                    status: new_status,
                    last_error: None,
                    at_ms: now_ms,
                },
            ];
            if new_status.is_terminal() {
                events.push(Event::LockReleased {
                    session_id: session_id.clone(),
                    at_ms: now_ms,
                });
            }
            if new_status == SessionStatus::Completed {
                if let (Some(goal_id), Some(url)) = (session.goal_id.clone(), change_proposal_url) {
                    events.push(Event::GoalReviewArtifactAdded {
                        id: goal_id,
                        artifact: ReviewArtifact {
                            url,
                            session_id: session_id.clone(),
                            external_agent_id: Some(external_agent_id.clone()),
                        },
                        at_ms: now_ms,
                    });
                }
            }
            Ok(((), events))
        })?;
        Ok(SyncOutcome::Transitioned(new_status))
    }

    /// Administrative force-terminate: idempotent, always lands on *failed*
    /// with locks released.
    pub fn force_terminate(&self, session_id: &SessionId) -> Result<(), EngineError> {
        self.fail_and_release(session_id, "force-terminated by operator")
    }

    pub(crate) fn fail_and_release(
        &self,
        session_id: &SessionId,
        reason: impl Into<String>,
    ) -> Result<(), EngineError> {
        let now_ms = self.now_ms();
        let reason = reason.into();
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![
                    Event::SessionStatusChanged {
                        id: session_id.clone(),
                        status: SessionStatus::Failed,
                        last_error: Some(reason.clone()),
                        at_ms: now_ms,
                    },
                    Event::LockReleased {
                        session_id: session_id.clone(),
                        at_ms: now_ms,
                    },
                ],
            ))
        })?;
        Ok(())
    }

    /// §4.5 step 9: remediation exhausted. Parent fails, locks release, and
    /// the linked goal (if any) transitions to *drifted* (invariant G2).
    pub(crate) fn fail_and_drift_goal(
        &self,
        session: &Session,
        reason: impl Into<String>,
    ) -> Result<(), EngineError> {
        let now_ms = self.now_ms();
        let reason = reason.into();
        let goal_id = session.goal_id.clone();
        let session_id = session.id.clone();
        self.registry.in_tx(|_state| {
            let mut events = vec![
                Event::SessionStatusChanged {
                    id: session_id.clone(),
                    status: SessionStatus::Failed,
                    last_error: Some(format!("{reason} (manual intervention required)")),
                    at_ms: now_ms,
                },
                Event::LockReleased {
                    session_id: session_id.clone(),
                    at_ms: now_ms,
                },
            ];
            if let Some(goal_id) = goal_id {
                events.push(Event::GoalStatusChanged {
                    id: goal_id,
                    status: relay_core::goal::GoalStatus::Drifted,
                    at_ms: now_ms,
                });
            }
            Ok(((), events))
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
