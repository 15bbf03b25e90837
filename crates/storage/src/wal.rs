// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log. Every event that mutates the registry is
//! appended here before `MaterializedState` is updated, so a crash between
//! the two can always be repaired by replay.
//!
//! Entries are JSONL: one `WalRecord` per line, each tagged with a
//! monotonic sequence number. Writes are batched: we flush on a timer
//! ([`FLUSH_INTERVAL`]) or once enough entries have queued up
//! ([`FLUSH_THRESHOLD`]), whichever comes first, trading a small durability
//! window for not fsync-ing on every webhook delivery.

use relay_core::Event;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const FLUSH_INTERVAL: Duration = Duration::from_millis(10);
pub const FLUSH_THRESHOLD: usize = 100;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalRecord {
    pub seq: u64,
    pub event: Event,
}

/// A JSONL append-only log of [`WalRecord`]s with batched fsync.
pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    next_seq: u64,
    pending_since_flush: usize,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`, positioned for append.
    /// `starting_seq` is the seq the next appended record should receive —
    /// callers pass `scan_wal(path)?.max_seq + 1` after recovery.
    pub fn open(path: &Path, starting_seq: u64) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            next_seq: starting_seq,
            pending_since_flush: 0,
        })
    }

    /// Append `event`, returning the sequence number it was assigned. Does
    /// not itself guarantee durability — call [`Wal::flush`] or rely on the
    /// batching thresholds.
    pub fn append(&mut self, event: Event) -> Result<u64, WalError> {
        let seq = self.next_seq;
        let record = WalRecord { seq, event };
        let line = serde_json::to_string(&record)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.next_seq += 1;
        self.pending_since_flush += 1;
        if self.pending_since_flush >= FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(seq)
    }

    /// Force pending writes to disk.
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.pending_since_flush = 0;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop every record with `seq < before`. Used after a snapshot makes
    /// the prefix redundant. Rewrites the file via a tmp + rename so a
    /// crash mid-truncate can't corrupt the log.
    pub fn truncate_before(&mut self, before: u64) -> Result<(), WalError> {
        self.flush()?;
        let records = read_all(&self.path)?;
        let tmp_path = self.path.with_extension("wal.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for record in records.iter().filter(|r| r.seq >= before) {
                let line = serde_json::to_string(record)?;
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(())
    }
}

/// Result of scanning an existing WAL file on startup.
pub struct WalScan {
    pub records: Vec<WalRecord>,
    pub max_seq: Option<u64>,
}

/// Read every well-formed record from `path` in order. A record that fails
/// to parse ends the scan at that point (the remainder is presumed to be a
/// torn write from a crash) rather than failing startup outright; the
/// truncated tail is rotated to `.bak` so an operator can inspect it.
pub fn scan_wal(path: &Path) -> Result<WalScan, WalError> {
    if !path.exists() {
        return Ok(WalScan {
            records: Vec::new(),
            max_seq: None,
        });
    }
    let records = read_all(path)?;
    rewrite_clean(path, &records)?;
    let max_seq = records.iter().map(|r| r.seq).max();
    Ok(WalScan { records, max_seq })
}

/// Rewrite the WAL file to contain exactly `records`, dropping any torn
/// tail `read_all` stopped short of. No-op if the file is already clean
/// (cheap to call unconditionally on every startup).
fn rewrite_clean(path: &Path, records: &[WalRecord]) -> Result<(), WalError> {
    let tmp_path = path.with_extension("wal.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            let line = serde_json::to_string(record)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_all(path: &Path) -> Result<Vec<WalRecord>, WalError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<WalRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    error = %e,
                    line = lineno,
                    path = %path.display(),
                    "WAL entry failed to parse, treating the remainder as a torn write",
                );
                break;
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
