use super::*;
use crate::config::EngineConfig;
use relay_core::goal::AcceptanceCriterion;
use relay_core::id::SequentialIdGen;
use relay_core::session::{SessionId, SessionSpec};
use relay_core::FakeClock;
use relay_providers::agent::fake::FakeAgentProvider;
use relay_providers::auditor::fake::FakeAuditorOracle;
use relay_providers::vcs::fake::FakeVcsProvider;
use relay_storage::Registry;
use std::sync::Arc;
use tempfile::tempdir;

type TestEngine = Engine<FakeAuditorOracle, FakeAgentProvider, FakeVcsProvider, FakeClock, SequentialIdGen>;

fn test_engine(dir: &std::path::Path) -> TestEngine {
    let registry = Arc::new(Registry::open(&dir.join("wal.jsonl"), &dir.join("snapshot.json")).unwrap());
    Engine::new(
        registry,
        FakeAuditorOracle::new(),
        FakeAgentProvider::new(),
        FakeVcsProvider::new(),
        FakeClock::default(),
        SequentialIdGen::default(),
        EngineConfig::default(),
    )
}

#[test]
fn create_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let id = engine
        .create_goal("title", "desc", vec![AcceptanceCriterion::new("c1", "tests pass")])
        .unwrap();
    let goal = engine.get_goal(&id).unwrap();
    assert_eq!(goal.title, "title");
    assert_eq!(goal.criteria.len(), 1);
}

#[test]
fn get_unknown_goal_is_not_found() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let err = engine.get_goal(&relay_core::id::GoalId::new("missing")).unwrap_err();
    assert!(matches!(err, EngineError::GoalNotFound(_)));
}

#[test]
fn update_rewrites_title_and_criteria() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let id = engine.create_goal("old", "", vec![]).unwrap();
    engine
        .update_goal(&id, "new", "desc", vec![AcceptanceCriterion::new("c1", "tests pass")])
        .unwrap();
    let goal = engine.get_goal(&id).unwrap();
    assert_eq!(goal.title, "new");
    assert_eq!(goal.criteria.len(), 1);
}

#[test]
fn update_unknown_goal_is_not_found() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let err = engine
        .update_goal(&relay_core::id::GoalId::new("missing"), "t", "d", vec![])
        .unwrap_err();
    assert!(matches!(err, EngineError::GoalNotFound(_)));
}

#[test]
fn delete_nulls_session_goal_pointer() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let goal_id = engine.create_goal("title", "", vec![]).unwrap();
    let session_id = SessionId::new("sess_1");
    engine
        .registry()
        .in_tx(|_state| {
            Ok((
                (),
                vec![relay_core::event::Event::SessionCreated {
                    id: session_id.clone(),
                    spec: SessionSpec {
                        goal_id: Some(goal_id.clone()),
                        cascade_id: None,
                        source_repo: "acme/widgets".to_string(),
                        branch_name: "agent/fix-1".to_string(),
                        base_branch: "main".to_string(),
                        remediation_depth: 0,
                    },
                    at_ms: 1_000,
                }],
            ))
        })
        .unwrap();

    engine.delete_goal(&goal_id).unwrap();

    assert!(engine.get_goal(&goal_id).is_err());
    let session = engine.registry().read_session_by_id(&session_id).unwrap();
    assert_eq!(session.goal_id, None);
}

#[test]
fn purge_locks_releases_every_held_path() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path());
    let session_id = SessionId::new("sess_1");
    engine
        .registry()
        .in_tx(|_state| {
            Ok((
                (),
                vec![relay_core::event::Event::SessionCreated {
                    id: session_id.clone(),
                    spec: SessionSpec {
                        goal_id: None,
                        cascade_id: None,
                        source_repo: "acme/widgets".to_string(),
                        branch_name: "agent/fix-1".to_string(),
                        base_branch: "main".to_string(),
                        remediation_depth: 0,
                    },
                    at_ms: 1_000,
                }],
            ))
        })
        .unwrap();
    engine.locks.acquire(&session_id, &["a.ts".to_string(), "b.ts".to_string()], 1_000).unwrap();

    let released = engine.purge_locks().unwrap();
    assert_eq!(released, 2);
    assert!(engine.list_locks().is_empty());
}
