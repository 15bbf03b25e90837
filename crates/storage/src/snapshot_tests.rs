use super::*;
use tempfile::tempdir;

#[test]
fn save_then_load_round_trips_the_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let mut state = MaterializedState::new();
    state.apply(&relay_core::Event::CascadeCreated {
        id: relay_core::CascadeId::new("casc_1"),
        trigger_session_id: None,
        core_files_changed: vec!["core.ts".to_string()],
        downstream_files: vec![],
        repair_job_count: 0,
        summary: "".to_string(),
        at_ms: 1_000,
    });
    Snapshot::new(42, state).save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(loaded.seq, 42);
    assert_eq!(loaded.state.cascades.len(), 1);
}

#[test]
fn load_of_missing_file_is_none_not_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(Snapshot::load(&path).unwrap().is_none());
}

#[test]
fn load_of_corrupt_file_rotates_to_bak_and_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, b"not json").unwrap();

    let result = Snapshot::load(&path).unwrap();
    assert!(result.is_none());
    assert!(path.with_extension("bak").exists());
    assert!(!path.exists());
}

#[test]
fn repeated_corruption_rotates_through_bak_generations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    for _ in 0..4 {
        fs::write(&path, b"not json").unwrap();
        Snapshot::load(&path).unwrap();
    }
    assert!(path.with_extension("bak").exists());
    assert!(path.with_extension("bak.2").exists());
    assert!(path.with_extension("bak.3").exists());
}
