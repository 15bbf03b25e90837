// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level `Engine`: composes the Registry Store, Lock Manager, the
//! three external collaborators, and the operator config into the single
//! object `relay-server` drives. Method implementations live in sibling
//! modules (`session.rs`, `cascade.rs`, `review.rs`) as `impl` blocks over
//! this type, mirroring the teacher's `Runtime<S, A, N, C>` split across
//! `runtime/job.rs`, `runtime/pipeline.rs`, `runtime/monitor.rs`.

use crate::config::EngineConfig;
use relay_core::{Clock, IdGen};
use relay_locks::LockManager;
use relay_providers::{AgentProvider, AuditorOracle, VcsProvider};
use relay_storage::Registry;
use std::sync::Arc;

pub struct Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    pub(crate) registry: Arc<Registry>,
    pub(crate) locks: LockManager,
    pub(crate) auditor: Au,
    pub(crate) agents: Ag,
    pub(crate) vcs: Vc,
    pub(crate) clock: C,
    pub(crate) ids: I,
    pub(crate) config: EngineConfig,
}

impl<Au, Ag, Vc, C, I> Engine<Au, Ag, Vc, C, I>
where
    Au: AuditorOracle,
    Ag: AgentProvider,
    Vc: VcsProvider,
    C: Clock,
    I: IdGen,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<Registry>,
        auditor: Au,
        agents: Ag,
        vcs: Vc,
        clock: C,
        ids: I,
        config: EngineConfig,
    ) -> Self {
        let locks = LockManager::new(Arc::clone(&registry));
        Self {
            registry,
            locks,
            auditor,
            agents,
            vcs,
            clock,
            ids,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.epoch_ms()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
