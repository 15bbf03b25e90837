// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the three external collaborators (§7 kinds 6/7:
/// ProviderError, ProviderRateLimit). The engine treats both uniformly —
/// non-fatal at the HTTP level, fatal at the session level — so they share
/// one enum rather than per-provider error types.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider timed out")]
    Timeout,
    #[error("provider rate limited, retry after {reset_at_ms}")]
    RateLimited { reset_at_ms: i64 },
    #[error("provider request failed: {0}")]
    Http(String),
    #[error("provider response could not be parsed: {0}")]
    Malformed(String),
}
