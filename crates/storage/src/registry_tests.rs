use super::*;
use relay_core::session::SessionSpec;
use tempfile::tempdir;

fn paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("wal.jsonl"), dir.join("snapshot.json"))
}

fn create_session(registry: &Registry, id: &str, at_ms: i64) {
    registry
        .in_tx(|_state| {
            Ok((
                (),
                vec![Event::SessionCreated {
                    id: SessionId::new(id),
                    spec: SessionSpec {
                        goal_id: None,
                        cascade_id: None,
                        source_repo: "acme/widgets".to_string(),
                        branch_name: "agent/fix".to_string(),
                        base_branch: "main".to_string(),
                        remediation_depth: 0,
                    },
                    at_ms,
                }],
            ))
        })
        .unwrap();
}

#[test]
fn in_tx_appends_and_applies_events_visible_to_reads() {
    let dir = tempdir().unwrap();
    let (wal_path, snapshot_path) = paths(dir.path());
    let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
    create_session(&registry, "sess_1", 1_000);

    let session = registry.read_session_by_id(&SessionId::new("sess_1"));
    assert!(session.is_some());
}

#[test]
fn reopening_replays_the_wal_from_scratch() {
    let dir = tempdir().unwrap();
    let (wal_path, snapshot_path) = paths(dir.path());
    {
        let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
        create_session(&registry, "sess_1", 1_000);
    }
    let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
    assert!(registry
        .read_session_by_id(&SessionId::new("sess_1"))
        .is_some());
}

#[test]
fn checkpoint_then_reopen_recovers_from_snapshot_alone() {
    let dir = tempdir().unwrap();
    let (wal_path, snapshot_path) = paths(dir.path());
    {
        let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
        create_session(&registry, "sess_1", 1_000);
        registry.checkpoint().unwrap();
    }
    let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
    assert!(registry
        .read_session_by_id(&SessionId::new("sess_1"))
        .is_some());
    // WAL prefix up to the checkpoint is gone; only the snapshot carries it.
    let scan = scan_wal(&wal_path).unwrap();
    assert!(scan.records.is_empty());
}

#[test]
fn a_failed_transaction_appends_no_events() {
    let dir = tempdir().unwrap();
    let (wal_path, snapshot_path) = paths(dir.path());
    let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
    let result: Result<(), RegistryError> = registry.in_tx(|_state| {
        Err(RegistryError::Domain("rejected".to_string()))
    });
    assert!(result.is_err());
    assert!(registry.list_active_sessions().is_empty());
}

#[test]
fn list_active_sessions_excludes_terminal_sessions() {
    let dir = tempdir().unwrap();
    let (wal_path, snapshot_path) = paths(dir.path());
    let registry = Registry::open(&wal_path, &snapshot_path).unwrap();
    create_session(&registry, "sess_1", 1_000);
    registry
        .in_tx(|_state| {
            Ok((
                (),
                vec![Event::SessionStatusChanged {
                    id: SessionId::new("sess_1"),
                    status: relay_core::session::SessionStatus::Completed,
                    last_error: None,
                    at_ms: 1_100,
                }],
            ))
        })
        .unwrap();
    assert!(registry.list_active_sessions().is_empty());
}
