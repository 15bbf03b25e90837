// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture builders shared by other crates' tests, gated behind
//! `feature = "test-support"` so they never ship in production builds.

use crate::goal::{AcceptanceCriterion, Goal};
use crate::id::{GoalId, SequentialIdGen};
use crate::session::{Session, SessionId, SessionSpec};

pub fn fixture_goal(id: &str, now_ms: i64) -> Goal {
    Goal::new(
        GoalId::new(id),
        "example goal",
        "exercise the system end to end",
        vec![AcceptanceCriterion::new("c1", "the thing works")],
        now_ms,
    )
}

pub fn fixture_session_spec() -> SessionSpec {
    SessionSpec {
        goal_id: None,
        cascade_id: None,
        source_repo: "acme/widgets".to_string(),
        branch_name: "agent/fix-1".to_string(),
        base_branch: "main".to_string(),
        remediation_depth: 0,
    }
}

pub fn fixture_session(id: &str, now_ms: i64) -> Session {
    #[allow(clippy::expect_used)]
    Session::new(SessionId::new(id), fixture_session_spec(), now_ms)
        .expect("fixture depth is within bounds")
}

pub fn id_gen() -> SequentialIdGen {
    SequentialIdGen::default()
}
