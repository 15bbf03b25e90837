// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component C4: the Cascade Engine (§4.4). Detects a core-file change,
//! calls the Auditor oracle to decompose the blast radius into disjoint
//! repair jobs, enforces the engine-side invariants regardless of what the
//! oracle returned, then dispatches each surviving job as a parallel
//! session under the Lock Manager's discipline.

use crate::engine::Engine;
use crate::error::EngineError;
use relay_core::cascade::{enforce_disjointness, enforce_parallelism_cap, CascadeStatus, CascadeTelemetry, RepairJob};
use relay_core::event::Event;
use relay_core::session::{SessionId, SessionSpec};
use relay_core::{Clock, IdGen};
use relay_locks::{AcquireOutcome, LockConflict};
use relay_providers::auditor::DecomposeInput;
use relay_providers::{AgentProvider, AuditorOracle, CreateAgentRequest, VcsProvider};

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeDispatchOutcome {
    pub cascade_id: relay_core::id::CascadeId,
    pub status: CascadeStatus,
    pub telemetry: CascadeTelemetry,
    pub dispatched_sessions: Vec<SessionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CascadeResponse {
    /// §4.4 overall response contract: no job dispatched and at least one
    /// conflict — the caller sees this as a structured conflict (HTTP 409).
    Conflict { conflicts: Vec<LockConflict> },
    Dispatched(CascadeDispatchOutcome),
    /// The oracle found no cascade, or confidence fell below the floor:
    /// recorded for observability but nothing was dispatched.
    NotDispatched { cascade_id: relay_core::id::CascadeId },
}

impl<Au, Ag, Vc, C, I> Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    pub async fn analyze_and_dispatch(
        &self,
        trigger_session_id: Option<SessionId>,
        goal_id: Option<relay_core::id::GoalId>,
        decompose_input: DecomposeInput,
    ) -> Result<CascadeResponse, EngineError> {
        let started = std::time::Instant::now();
        let analysis = self.auditor.decompose(decompose_input).await?;

        let cascade_id = self.ids.cascade_id();
        let now_ms = self.now_ms();
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::CascadeCreated {
                    id: cascade_id.clone(),
                    trigger_session_id: trigger_session_id.clone(),
                    core_files_changed: analysis.core_files_changed.clone(),
                    downstream_files: analysis.downstream_files.clone(),
                    repair_job_count: analysis.repair_jobs.len() as u32,
                    summary: analysis.summary.clone(),
                    at_ms: now_ms,
                }],
            ))
        })?;

        if !analysis.is_cascade || analysis.confidence < self.config.min_confidence {
            self.record_dispatch(&cascade_id, CascadeTelemetry::default())?;
            return Ok(CascadeResponse::NotDispatched { cascade_id });
        }

        let jobs = enforce_disjointness(analysis.repair_jobs);
        let jobs = enforce_parallelism_cap(jobs, self.config.max_parallel_agents);

        self.dispatch_jobs_under_cascade(cascade_id, goal_id, jobs, started)
            .await
    }


    /// Orchestrator-batch path (§6 `/orchestrator/batch`): the jobs are
    /// already decided by the caller, so unlike [`Self::analyze_and_dispatch`]
    /// there is no Auditor decompose call — a cascade row is still recorded
    /// for observability and the same disjointness/parallelism invariants
    /// and dispatch loop apply.
    pub async fn dispatch_batch(
        &self,
        goal_id: Option<relay_core::id::GoalId>,
        jobs: Vec<RepairJob>,
    ) -> Result<CascadeResponse, EngineError> {
        let started = std::time::Instant::now();
        let cascade_id = self.ids.cascade_id();
        let now_ms = self.now_ms();
        let core_files_changed: Vec<String> = jobs.iter().flat_map(|j| j.files.clone()).collect();
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::CascadeCreated {
                    id: cascade_id.clone(),
                    trigger_session_id: None,
                    core_files_changed: core_files_changed.clone(),
                    downstream_files: Vec::new(),
                    repair_job_count: jobs.len() as u32,
                    summary: "orchestrator batch dispatch".to_string(),
                    at_ms: now_ms,
                }],
            ))
        })?;

        let jobs = enforce_disjointness(jobs);
        let jobs = enforce_parallelism_cap(jobs, self.config.max_parallel_agents);

        self.dispatch_jobs_under_cascade(cascade_id, goal_id, jobs, started)
            .await
    }

    async fn dispatch_jobs_under_cascade(
        &self,
        cascade_id: relay_core::id::CascadeId,
        goal_id: Option<relay_core::id::GoalId>,
        jobs: Vec<RepairJob>,
        started: std::time::Instant,
    ) -> Result<CascadeResponse, EngineError> {
        let goal_id = match goal_id {
            Some(id) => Some(id),
            None if !jobs.is_empty() => Some(self.create_synthetic_goal(&jobs)?),
            None => None,
        };

        let mut dispatched_sessions = Vec::new();
        let mut conflicts = Vec::new();
        let mut failed_count = 0u32;

        for job in &jobs {
            match self
                .dispatch_repair_job(job, &cascade_id, goal_id.clone())
                .await?
            {
                RepairJobOutcome::Dispatched(session_id) => dispatched_sessions.push(session_id),
                RepairJobOutcome::Conflict(job_conflicts) => {
                    conflicts.extend(job_conflicts);
                    failed_count += 1;
                }
                RepairJobOutcome::AgentRejected => failed_count += 1,
            }
        }

        let telemetry = CascadeTelemetry {
            dispatch_latency_ms: started.elapsed().as_millis() as u64,
            conflict_count: conflicts.len() as u32,
            dispatched_count: dispatched_sessions.len() as u32,
            failed_count,
        };
        let status = self.record_dispatch(&cascade_id, telemetry.clone())?;

        if dispatched_sessions.is_empty() && !conflicts.is_empty() {
            return Ok(CascadeResponse::Conflict { conflicts });
        }

        Ok(CascadeResponse::Dispatched(CascadeDispatchOutcome {
            cascade_id,
            status,
            telemetry,
            dispatched_sessions,
        }))
    }

    fn record_dispatch(
        &self,
        cascade_id: &relay_core::id::CascadeId,
        telemetry: CascadeTelemetry,
    ) -> Result<CascadeStatus, EngineError> {
        let now_ms = self.now_ms();
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::CascadeDispatchRecorded {
                    id: cascade_id.clone(),
                    telemetry: telemetry.clone(),
                    at_ms: now_ms,
                }],
            ))
        })?;
        Ok(if telemetry.dispatched_count > 0 {
            CascadeStatus::Dispatched
        } else {
            CascadeStatus::Failed
        })
    }

    /// §9 Open Question 1: a cascade dispatched without an explicit goal
    /// synthesizes one whose acceptance criteria are the repair prompts
    /// themselves (see DESIGN.md for the prune/drift lifecycle decision).
    fn create_synthetic_goal(&self, jobs: &[RepairJob]) -> Result<relay_core::id::GoalId, EngineError> {
        let goal_id = self.ids.goal_id();
        let now_ms = self.now_ms();
        let prompts: Vec<String> = jobs.iter().map(|j| j.prompt.clone()).collect();
        let goal = relay_core::goal::Goal::new_synthetic(goal_id.clone(), &prompts, now_ms);
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::GoalCreated {
                    id: goal.id.clone(),
                    title: goal.title.clone(),
                    description: goal.description.clone(),
                    criteria: goal.criteria.clone(),
                    synthetic: goal.synthetic,
                    at_ms: now_ms,
                }],
            ))
        })?;
        Ok(goal_id)
    }

    async fn dispatch_repair_job(
        &self,
        job: &RepairJob,
        cascade_id: &relay_core::id::CascadeId,
        goal_id: Option<relay_core::id::GoalId>,
    ) -> Result<RepairJobOutcome, EngineError> {
        let now_ms = self.now_ms();
        let session_id = self.ids.session_id();
        let spec = SessionSpec {
            goal_id,
            cascade_id: Some(cascade_id.clone()),
            source_repo: String::new(),
            branch_name: format!("cascade/{}/{}", cascade_id.as_str(), job.id),
            base_branch: "main".to_string(),
            remediation_depth: 0,
        };
        self.registry.in_tx(|_state| {
            Ok((
                (),
                vec![Event::SessionCreated {
                    id: session_id.clone(),
                    spec: spec.clone(),
                    at_ms: now_ms,
                }],
            ))
        })?;

        let outcome = self.locks.acquire(&session_id, &job.files, now_ms)?;
        let conflicts = match outcome {
            AcquireOutcome::Ok { .. } => Vec::new(),
            AcquireOutcome::Conflict { conflicts } => conflicts,
        };
        if !conflicts.is_empty() {
            self.fail_and_release(
                &session_id,
                format!("lock conflict on dispatch: {conflicts:?}"),
            )?;
            return Ok(RepairJobOutcome::Conflict(conflicts));
        }

        match self
            .agents
            .create_agent(CreateAgentRequest {
                prompt: job.prompt.clone(),
                source_repo: spec.source_repo.clone(),
                starting_branch: spec.branch_name.clone(),
                context: None,
            })
            .await
        {
            Ok(created) => {
                self.registry.in_tx(|_state| {
                    Ok((
                        (),
                        vec![Event::SessionAgentAccepted {
                            id: session_id.clone(),
                            external_agent_id: created.id,
                            at_ms: now_ms,
                        }],
                    ))
                })?;
                Ok(RepairJobOutcome::Dispatched(session_id))
            }
            Err(e) => {
                self.fail_and_release(&session_id, e.to_string())?;
                Ok(RepairJobOutcome::AgentRejected)
            }
        }
    }
}

enum RepairJobOutcome {
    Dispatched(SessionId),
    Conflict(Vec<LockConflict>),
    AgentRejected,
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
