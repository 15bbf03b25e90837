use super::*;

fn spec(depth: u32) -> SessionSpec {
    SessionSpec {
        goal_id: None,
        cascade_id: None,
        source_repo: "acme/widgets".to_string(),
        branch_name: "agent/fix".to_string(),
        base_branch: "main".to_string(),
        remediation_depth: depth,
    }
}

#[test]
fn new_session_starts_queued() {
    let s = Session::new(SessionId::new("s1"), spec(0), 1_000).unwrap();
    assert_eq!(s.status, SessionStatus::Queued);
    assert!(!s.is_terminal());
}

#[test]
fn construction_rejects_depth_past_the_bound() {
    let err = Session::new(SessionId::new("s1"), spec(MAX_REMEDIATION_DEPTH + 1), 1_000)
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::RemediationDepthExceeded {
            depth: MAX_REMEDIATION_DEPTH + 1,
            max: MAX_REMEDIATION_DEPTH,
        }
    );
}

#[test]
fn terminal_states_ignore_further_transitions() {
    let mut s = Session::new(SessionId::new("s1"), spec(0), 1_000).unwrap();
    s.complete(1_100);
    assert_eq!(s.status, SessionStatus::Completed);

    s.accept_by_agent("agent-1", 1_200);
    s.fail("late failure", 1_300);
    assert_eq!(s.status, SessionStatus::Completed);
    assert_eq!(s.updated_at_ms, 1_100);
}

#[test]
fn fail_keeps_the_first_recorded_reason() {
    let mut s = Session::new(SessionId::new("s1"), spec(0), 1_000).unwrap();
    s.fail("first", 1_100);
    s.fail("second", 1_200);
    assert_eq!(s.last_error.as_deref(), Some("first"));
}

#[test]
fn duplicate_commit_detection_matches_last_reviewed() {
    let mut s = Session::new(SessionId::new("s1"), spec(0), 1_000).unwrap();
    assert!(!s.is_duplicate_commit("abc"));
    s.record_reviewed_commit("abc", 1_100);
    assert!(s.is_duplicate_commit("abc"));
    assert!(!s.is_duplicate_commit("def"));
}

#[test]
fn child_spec_increments_depth_and_copies_branch_identity() {
    let s = Session::new(SessionId::new("s1"), spec(1), 1_000).unwrap();
    let child = s.child_spec(None);
    assert_eq!(child.remediation_depth, 2);
    assert_eq!(child.branch_name, s.branch_name);
    assert_eq!(child.base_branch, s.base_branch);
}

#[test]
fn at_max_remediation_depth_flags_the_boundary_value() {
    let s = Session::new(SessionId::new("s1"), spec(MAX_REMEDIATION_DEPTH), 1_000).unwrap();
    assert!(s.at_max_remediation_depth());
}

#[test]
fn accept_then_reject_is_ignored_because_terminal_wins() {
    let mut s = Session::new(SessionId::new("s1"), spec(0), 1_000).unwrap();
    s.accept_by_agent("agent-1", 1_100);
    assert_eq!(s.status, SessionStatus::Executing);
    s.enter_verifying(1_200);
    assert_eq!(s.status, SessionStatus::Verifying);
    s.complete(1_300);
    assert_eq!(s.status, SessionStatus::Completed);
}
