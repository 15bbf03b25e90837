// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by entity-level invariant checks. These are distinct from
//! the operational errors in `relay-engine`/`relay-server`: they fire only
//! when a caller tries to push an entity into a state its own invariants
//! forbid (e.g. dispatching a session past the remediation depth bound).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("session is already in a terminal state")]
    AlreadyTerminal,
    #[error("remediation depth {depth} exceeds the maximum of {max}")]
    RemediationDepthExceeded { depth: u32, max: u32 },
    #[error("criterion {0} is not present on this goal")]
    UnknownCriterion(String),
}
