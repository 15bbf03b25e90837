// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Epoch-millis <-> RFC3339 conversions used by DTOs and log lines.

use chrono::{DateTime, Utc};

/// Render epoch millis as RFC3339 (e.g. for JSON responses and logs).
pub fn format_epoch_ms(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_default())
        .to_rfc3339()
}

/// Parse an RFC3339 timestamp into epoch millis. Returns `None` on malformed input.
pub fn parse_epoch_ms(s: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
