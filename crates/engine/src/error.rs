// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime.

use relay_core::DomainError;
use relay_locks::LockError;
use relay_providers::ProviderError;
use relay_storage::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("lock error: {0}")]
    Lock(#[from] LockError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("goal not found: {0}")]
    GoalNotFound(String),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("cascade not found: {0}")]
    CascadeNotFound(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
