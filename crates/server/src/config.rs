// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-level configuration: where the binary listens, where the
//! Registry Store persists, and how to reach the three external
//! collaborators. Secrets (API keys, the webhook HMAC secret) come from
//! the environment rather than the TOML file so they never land in a
//! config file an operator might commit; everything else — the engine
//! tunables of §6 — loads from TOML via [`relay_engine::config::EngineConfig`],
//! mirroring how the teacher's daemon resolves `.oj/config.toml`.

use relay_engine::config::EngineConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
    #[error("invalid value for environment variable {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error(transparent)]
    Engine(#[from] relay_engine::config::ConfigError),
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

fn env_var_or(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub wal_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub log_path: PathBuf,
    pub webhook_secret: String,
    pub agent_provider_base_url: String,
    pub agent_provider_api_key: String,
    pub vcs_provider_base_url: String,
    pub vcs_provider_api_key: String,
    pub auditor_base_url: String,
    pub auditor_api_key: String,
    pub engine: EngineConfig,
    /// §9 design note: the core has no background workers by default; this
    /// turns on the reconciliation timer as an opt-in augmentation.
    pub reconciliation_enabled: bool,
    pub reconciliation_interval: Duration,
    pub checkpoint_interval: Duration,
}

impl ServerConfig {
    /// Loads connection/secret settings from the environment and engine
    /// tunables from the TOML file at `RELAY_CONFIG_PATH` (default
    /// `relay.toml`), same two-source split as the teacher's daemon
    /// (XDG state dir from env, `.oj/config.toml` for tunables).
    pub fn from_env() -> Result<Self, ConfigError> {
        let engine_config_path = env_var_or("RELAY_CONFIG_PATH", "relay.toml");
        let engine = if Path::new(&engine_config_path).exists() {
            EngineConfig::load(Path::new(&engine_config_path))?
        } else {
            EngineConfig::default()
        };

        let reconciliation_interval_secs: u64 = env_var_or("RELAY_RECONCILE_INTERVAL_SECS", "300")
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name: "RELAY_RECONCILE_INTERVAL_SECS",
                value: env_var_or("RELAY_RECONCILE_INTERVAL_SECS", "300"),
            })?;
        let checkpoint_interval_secs: u64 = env_var_or("RELAY_CHECKPOINT_INTERVAL_SECS", "60")
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name: "RELAY_CHECKPOINT_INTERVAL_SECS",
                value: env_var_or("RELAY_CHECKPOINT_INTERVAL_SECS", "60"),
            })?;

        Ok(Self {
            bind_addr: env_var_or("RELAY_BIND_ADDR", "0.0.0.0:8080"),
            wal_path: PathBuf::from(env_var_or("RELAY_WAL_PATH", "relay.wal")),
            snapshot_path: PathBuf::from(env_var_or("RELAY_SNAPSHOT_PATH", "relay.snapshot")),
            log_path: PathBuf::from(env_var_or("RELAY_LOG_PATH", "relay.log")),
            webhook_secret: env_var("RELAY_WEBHOOK_SECRET")?,
            agent_provider_base_url: env_var("RELAY_AGENT_PROVIDER_URL")?,
            agent_provider_api_key: env_var("RELAY_AGENT_PROVIDER_KEY")?,
            vcs_provider_base_url: env_var("RELAY_VCS_PROVIDER_URL")?,
            vcs_provider_api_key: env_var("RELAY_VCS_PROVIDER_KEY")?,
            auditor_base_url: env_var("RELAY_AUDITOR_URL")?,
            auditor_api_key: env_var("RELAY_AUDITOR_KEY")?,
            engine,
            reconciliation_enabled: env_var_or("RELAY_RECONCILE_ENABLED", "false") == "true",
            reconciliation_interval: Duration::from_secs(reconciliation_interval_secs),
            checkpoint_interval: Duration::from_secs(checkpoint_interval_secs),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
