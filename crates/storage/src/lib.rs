// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Registry Store (component C1): a write-ahead log plus a
//! materialized read model, checkpointed to a snapshot periodically so
//! recovery never replays the whole history.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod registry;
pub mod snapshot;
pub mod state;
pub mod wal;

pub use registry::{Registry, RegistryError};
pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use wal::{Wal, WalError, WalRecord};
