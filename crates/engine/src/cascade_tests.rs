use super::*;
use crate::config::EngineConfig;
use relay_core::event::Event;
use relay_core::id::SequentialIdGen;
use relay_core::session::{SessionId, SessionSpec};
use relay_core::FakeClock;
use relay_providers::agent::fake::FakeAgentProvider;
use relay_providers::auditor::fake::{cascade_with_jobs, no_cascade, FakeAuditorOracle};
use relay_providers::auditor::DecomposeInput;
use relay_providers::vcs::fake::FakeVcsProvider;
use relay_storage::Registry;
use std::sync::Arc;
use tempfile::tempdir;

type TestEngine = Engine<FakeAuditorOracle, FakeAgentProvider, FakeVcsProvider, FakeClock, SequentialIdGen>;

fn test_engine(dir: &std::path::Path, config: EngineConfig) -> TestEngine {
    let registry = Arc::new(
        Registry::open(&dir.join("wal.jsonl"), &dir.join("snapshot.json")).unwrap(),
    );
    Engine::new(
        registry,
        FakeAuditorOracle::new(),
        FakeAgentProvider::new(),
        FakeVcsProvider::new(),
        FakeClock::default(),
        SequentialIdGen::default(),
        config,
    )
}

fn empty_input() -> DecomposeInput {
    DecomposeInput {
        core_file_diffs: vec![],
        changed_paths: vec!["src/schema/user.rs".to_string()],
    }
}

#[tokio::test]
async fn no_cascade_is_recorded_but_not_dispatched() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path(), EngineConfig::default());
    engine.auditor.push_decomposition(Ok(no_cascade()));

    let response = engine
        .analyze_and_dispatch(None, None, empty_input())
        .await
        .unwrap();

    match response {
        CascadeResponse::NotDispatched { .. } => {}
        other => panic!("expected NotDispatched, got {other:?}"),
    }
}

#[tokio::test]
async fn low_confidence_cascade_is_recorded_but_not_dispatched() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path(), EngineConfig::default());
    engine.auditor.push_decomposition(Ok(cascade_with_jobs(
        vec![("job-1", &["src/handlers/a.rs"])],
        0.5,
    )));

    let response = engine
        .analyze_and_dispatch(None, None, empty_input())
        .await
        .unwrap();

    assert!(matches!(response, CascadeResponse::NotDispatched { .. }));
}

#[tokio::test]
async fn cascade_with_jobs_dispatches_a_session_per_job_and_synthesizes_a_goal() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path(), EngineConfig::default());
    engine.auditor.push_decomposition(Ok(cascade_with_jobs(
        vec![
            ("job-1", &["src/handlers/a.rs"]),
            ("job-2", &["src/handlers/b.rs"]),
        ],
        0.9,
    )));

    let response = engine
        .analyze_and_dispatch(None, None, empty_input())
        .await
        .unwrap();

    let outcome = match response {
        CascadeResponse::Dispatched(outcome) => outcome,
        other => panic!("expected Dispatched, got {other:?}"),
    };
    assert_eq!(outcome.dispatched_sessions.len(), 2);
    assert_eq!(outcome.telemetry.dispatched_count, 2);
    assert_eq!(outcome.telemetry.conflict_count, 0);
    for session_id in &outcome.dispatched_sessions {
        let session = engine.registry().read_session_by_id(session_id).unwrap();
        assert!(session.goal_id.is_some());
        assert!(session.external_agent_id.is_some());
    }
}

#[tokio::test]
async fn scenario_e_cascade_with_a_pre_existing_lock_reports_conflict() {
    let dir = tempdir().unwrap();
    let engine = test_engine(dir.path(), EngineConfig::default());

    let holder = SessionId::new("holder");
    engine
        .registry()
        .in_tx(|_state| {
            Ok((
                (),
                vec![
                    Event::SessionCreated {
                        id: holder.clone(),
                        spec: SessionSpec {
                            goal_id: None,
                            cascade_id: None,
                            source_repo: "acme/widgets".to_string(),
                            branch_name: "agent/other".to_string(),
                            base_branch: "main".to_string(),
                            remediation_depth: 0,
                        },
                        at_ms: 1_000,
                    },
                    Event::LockAcquired {
                        session_id: holder.clone(),
                        paths: vec!["src/handlers/a.rs".to_string()],
                        at_ms: 1_000,
                    },
                ],
            ))
        })
        .unwrap();

    engine.auditor.push_decomposition(Ok(cascade_with_jobs(
        vec![("job-1", &["src/handlers/a.rs"])],
        0.9,
    )));

    let response = engine
        .analyze_and_dispatch(None, None, empty_input())
        .await
        .unwrap();

    match response {
        CascadeResponse::Conflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].held_by, holder);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn disjointness_and_parallelism_cap_are_enforced_before_dispatch() {
    let dir = tempdir().unwrap();
    let config = EngineConfig {
        max_parallel_agents: 1,
        ..EngineConfig::default()
    };
    let engine = test_engine(dir.path(), config);
    engine.auditor.push_decomposition(Ok(cascade_with_jobs(
        vec![
            ("job-1", &["src/handlers/a.rs"]),
            ("job-2", &["src/handlers/a.rs"]),
        ],
        0.9,
    )));

    let response = engine
        .analyze_and_dispatch(None, None, empty_input())
        .await
        .unwrap();

    let outcome = match response {
        CascadeResponse::Dispatched(outcome) => outcome,
        other => panic!("expected Dispatched, got {other:?}"),
    };
    assert_eq!(outcome.dispatched_sessions.len(), 1);
}
