// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newtype string identifiers and the generators that mint them.

use std::borrow::Borrow;
use std::fmt;

/// Shorten an id to its first 8 characters for compact display.
pub trait ShortId {
    fn short(&self) -> &str;
}

/// Defines a newtype wrapper around `String` with the usual identifier
/// ergonomics: `Debug`/`Display`/`Hash`/serde, conversions from `String`
/// and `&str`, and comparisons against string slices without allocating.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl $crate::id::ShortId for $name {
            fn short(&self) -> &str {
                let len = self.0.len().min(8);
                &self.0[..len]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(GoalId);
define_id!(SessionId);
define_id!(CascadeId);

/// Generates ids for new entities. Production code uses [`UuidIdGen`];
/// tests use [`SequentialIdGen`] so fixtures are deterministic and diffable.
pub trait IdGen: Send + Sync {
    fn goal_id(&self) -> GoalId;
    fn session_id(&self) -> SessionId;
    fn cascade_id(&self) -> CascadeId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn goal_id(&self) -> GoalId {
        GoalId::new(format!("goal_{}", uuid::Uuid::new_v4()))
    }

    fn session_id(&self) -> SessionId {
        SessionId::new(format!("sess_{}", uuid::Uuid::new_v4()))
    }

    fn cascade_id(&self) -> CascadeId {
        CascadeId::new(format!("casc_{}", uuid::Uuid::new_v4()))
    }
}

/// Deterministic id generator for tests: `goal_1`, `goal_2`, ... per kind.
#[derive(Debug, Default)]
pub struct SequentialIdGen {
    goals: std::sync::atomic::AtomicU64,
    sessions: std::sync::atomic::AtomicU64,
    cascades: std::sync::atomic::AtomicU64,
}

impl IdGen for SequentialIdGen {
    fn goal_id(&self) -> GoalId {
        let n = self.goals.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
        GoalId::new(format!("goal_{n}"))
    }

    fn session_id(&self) -> SessionId {
        let n = self
            .sessions
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;
        SessionId::new(format!("sess_{n}"))
    }

    fn cascade_id(&self) -> CascadeId {
        let n = self
            .cascades
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;
        CascadeId::new(format!("casc_{n}"))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
