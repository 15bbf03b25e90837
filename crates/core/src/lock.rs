// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `FileLock` entity. Mutated exclusively by `relay-locks::LockManager`
//! (component C2) — this module holds only the row shape and the
//! deduplication helper every caller needs before acquiring.

use crate::session::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLock {
    pub file_path: String,
    pub session_id: SessionId,
    pub locked_at_ms: i64,
}

/// Dedupe a requested path list before the manager reads existing locks,
/// preserving first-seen order (§4.2: "Deduplication of the input path
/// list happens before the read").
pub fn dedupe_paths(paths: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(paths.len());
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        if seen.insert(path.clone()) {
            out.push(path.clone());
        }
    }
    out
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
