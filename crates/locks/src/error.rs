// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use relay_core::session::SessionId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LockError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("session {0} is already terminal")]
    SessionTerminal(SessionId),
}
