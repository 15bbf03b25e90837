// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The axum `State` extractor: a cheaply-`Clone`-able handle to the
//! production [`relay_engine::Engine`] wired to the real HTTP-backed
//! providers, plus the webhook secret every `/webhook/vcs` request needs.

use relay_core::{SystemClock, UuidIdGen};
use relay_engine::Engine;
use relay_providers::http::{HttpAgentProvider, HttpAuditorOracle, HttpVcsProvider};
use relay_providers::Traced;
use std::sync::Arc;

/// The concrete engine instantiation `relayd` drives in production; every
/// outbound provider call is wrapped in [`Traced`] for latency/outcome logs.
pub type ProdEngine = Engine<
    Traced<HttpAuditorOracle>,
    Traced<HttpAgentProvider>,
    Traced<HttpVcsProvider>,
    SystemClock,
    UuidIdGen,
>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProdEngine>,
    pub webhook_secret: Arc<str>,
}

impl AppState {
    pub fn new(engine: Arc<ProdEngine>, webhook_secret: impl Into<Arc<str>>) -> Self {
        Self {
            engine,
            webhook_secret: webhook_secret.into(),
        }
    }
}
