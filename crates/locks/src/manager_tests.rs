use super::*;
use relay_core::session::{Session, SessionSpec};
use relay_storage::MaterializedState;

fn state_with_session(id: &str) -> MaterializedState {
    let mut state = MaterializedState::new();
    let spec = SessionSpec {
        goal_id: None,
        cascade_id: None,
        source_repo: "acme/widgets".to_string(),
        branch_name: "agent/fix".to_string(),
        base_branch: "main".to_string(),
        remediation_depth: 0,
    };
    let session = Session::new(SessionId::new(id), spec, 1_000).unwrap();
    state.sessions.insert(session.id.clone(), session);
    state
}

#[test]
fn scenario_a_two_sessions_race_for_one_path() {
    let mut state = state_with_session("s1");
    let s2 = Session::new(
        SessionId::new("s2"),
        SessionSpec {
            goal_id: None,
            cascade_id: None,
            source_repo: "acme/widgets".to_string(),
            branch_name: "agent/other".to_string(),
            base_branch: "main".to_string(),
            remediation_depth: 0,
        },
        1_000,
    )
    .unwrap();
    state.sessions.insert(s2.id.clone(), s2);

    let (outcome, events) =
        plan_acquire(&state, &SessionId::new("s1"), &["a.ts".to_string()], 1_100).unwrap();
    assert_eq!(outcome, AcquireOutcome::Ok { locked: vec!["a.ts".to_string()] });
    for event in &events {
        state.apply(event);
    }

    let (outcome, events) =
        plan_acquire(&state, &SessionId::new("s2"), &["a.ts".to_string()], 1_200).unwrap();
    assert!(events.is_empty());
    match outcome {
        AcquireOutcome::Conflict { conflicts } => {
            assert_eq!(conflicts[0].held_by, SessionId::new("s1"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn scenario_b_atomic_batch_leaves_no_partial_lock_state() {
    let mut state = state_with_session("s1");
    state.apply(&Event::LockAcquired {
        session_id: SessionId::new("s1"),
        paths: vec!["page.ts".to_string()],
        at_ms: 1_000,
    });
    let s2 = Session::new(
        SessionId::new("s2"),
        SessionSpec {
            goal_id: None,
            cascade_id: None,
            source_repo: "acme/widgets".to_string(),
            branch_name: "agent/other".to_string(),
            base_branch: "main".to_string(),
            remediation_depth: 0,
        },
        1_000,
    )
    .unwrap();
    state.sessions.insert(s2.id.clone(), s2);

    let (outcome, events) = plan_acquire(
        &state,
        &SessionId::new("s2"),
        &["layout.ts".to_string(), "page.ts".to_string()],
        1_100,
    )
    .unwrap();
    assert!(matches!(outcome, AcquireOutcome::Conflict { .. }));
    assert!(events.is_empty());
    assert!(!state.locks.contains_key("layout.ts"));
}

#[test]
fn acquire_is_idempotent_for_paths_already_held_by_the_same_session() {
    let mut state = state_with_session("s1");
    state.apply(&Event::LockAcquired {
        session_id: SessionId::new("s1"),
        paths: vec!["a.ts".to_string()],
        at_ms: 1_000,
    });
    let (outcome, events) =
        plan_acquire(&state, &SessionId::new("s1"), &["a.ts".to_string()], 1_100).unwrap();
    assert_eq!(outcome, AcquireOutcome::Ok { locked: vec!["a.ts".to_string()] });
    assert!(events.is_empty());
}

#[test]
fn acquire_against_a_terminal_session_errors() {
    let mut state = state_with_session("s1");
    if let Some(s) = state.sessions.get_mut(&SessionId::new("s1")) {
        s.complete(1_000);
    }
    let result = plan_acquire(&state, &SessionId::new("s1"), &["a.ts".to_string()], 1_100);
    assert_eq!(result.unwrap_err(), LockError::SessionTerminal(SessionId::new("s1")));
}

#[test]
fn dedupe_happens_before_conflict_checks_so_duplicate_input_does_not_self_conflict() {
    let state = state_with_session("s1");
    let (outcome, _events) = plan_acquire(
        &state,
        &SessionId::new("s1"),
        &["a.ts".to_string(), "a.ts".to_string()],
        1_000,
    )
    .unwrap();
    assert_eq!(outcome, AcquireOutcome::Ok { locked: vec!["a.ts".to_string()] });
}

#[test]
fn transfer_preserves_total_lock_count() {
    let mut state = state_with_session("parent");
    state.apply(&Event::LockAcquired {
        session_id: SessionId::new("parent"),
        paths: vec!["a.ts".to_string(), "b.ts".to_string()],
        at_ms: 1_000,
    });
    let before = state.locks.len();
    for event in transfer_events(&SessionId::new("parent"), &SessionId::new("child"), 1_100) {
        state.apply(&event);
    }
    assert_eq!(state.locks.len(), before);
    assert!(state
        .locks
        .values()
        .all(|l| l.session_id == SessionId::new("child")));
}

#[test]
fn release_then_acquire_round_trips_to_pre_state() {
    let mut state = state_with_session("s1");
    let before = state.locks.clone();
    state.apply(&Event::LockAcquired {
        session_id: SessionId::new("s1"),
        paths: vec!["a.ts".to_string()],
        at_ms: 1_000,
    });
    for event in release_events(&SessionId::new("s1"), 1_100) {
        state.apply(&event);
    }
    assert_eq!(state.locks, before);
}
