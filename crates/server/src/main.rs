// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relayd`: the control-plane HTTP daemon. Loads configuration, opens the
//! Registry Store, wires the production engine to the three HTTP-backed
//! providers (each traced), and serves the §6 route table until a signal
//! asks it to stop.

use relay_core::{SystemClock, UuidIdGen};
use relay_engine::Engine;
use relay_providers::http::{HttpAgentProvider, HttpAuditorOracle, HttpVcsProvider};
use relay_providers::Traced;
use relay_server::state::AppState;
use relay_server::{build_router, ServerConfig};
use relay_storage::Registry;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let _log_guard = setup_logging(&config)?;

    info!("starting relayd");

    let registry = Arc::new(Registry::open(&config.wal_path, &config.snapshot_path)?);

    let auditor = Traced::new(
        HttpAuditorOracle::new(config.auditor_base_url.clone(), config.auditor_api_key.clone()),
        "auditor",
    );
    let agents = Traced::new(
        HttpAgentProvider::new(config.agent_provider_base_url.clone(), config.agent_provider_api_key.clone()),
        "agent",
    );
    let vcs = Traced::new(
        HttpVcsProvider::new(config.vcs_provider_base_url.clone(), config.vcs_provider_api_key.clone()),
        "vcs",
    );

    let engine = Arc::new(Engine::new(
        Arc::clone(&registry),
        auditor,
        agents,
        vcs,
        SystemClock,
        UuidIdGen,
        config.engine.clone(),
    ));

    relay_server::checkpoint::spawn(Arc::clone(&registry), config.checkpoint_interval);
    if config.reconciliation_enabled {
        relay_server::reconcile::spawn(Arc::clone(&engine), config.reconciliation_interval);
    }

    let state = AppState::new(Arc::clone(&engine), config.webhook_secret.clone());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "relayd ready");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relayd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }
}

fn setup_logging(
    config: &relay_server::ServerConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or("log path has no parent directory")?,
        config.log_path.file_name().ok_or("log path has no file name")?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
