// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for crash recovery.
//!
//! A snapshot stores the complete materialized state at a point in time,
//! identified by the WAL sequence number it was taken at. Recovery loads
//! the snapshot and replays WAL entries after that sequence.

use crate::state::MaterializedState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, state: MaterializedState) -> Self {
        Self {
            seq,
            state,
            created_at: Utc::now(),
        }
    }

    /// Save atomically: write to `.tmp`, fsync, then rename over `path`. A
    /// crash mid-write leaves the previous snapshot untouched.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Returns `Ok(None)` if the file doesn't exist or is corrupt. A
    /// corrupt snapshot is moved to `.bak` so the daemon recovers via WAL
    /// replay from scratch rather than refusing to start.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                let bak_path = rotate_bak_path(path);
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt snapshot, moving to .bak and starting fresh",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out. Keeps
/// up to [`MAX_BAK_FILES`]; the oldest is removed when the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
