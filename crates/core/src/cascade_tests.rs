use super::*;

fn job(id: &str, files: &[&str], priority: Priority) -> RepairJob {
    RepairJob {
        id: id.to_string(),
        files: files.iter().map(|f| f.to_string()).collect(),
        prompt: format!("fix {id}"),
        priority,
        estimated_impact: "medium".to_string(),
    }
}

#[test]
fn disjointness_keeps_the_higher_priority_job_when_paths_collide() {
    let jobs = vec![
        job("low", &["a.ts", "b.ts"], Priority::Low),
        job("high", &["b.ts", "c.ts"], Priority::High),
    ];
    let result = enforce_disjointness(jobs);
    let high = result.iter().find(|j| j.id == "high").unwrap();
    let low = result.iter().find(|j| j.id == "low").unwrap();
    assert_eq!(high.files, vec!["b.ts".to_string(), "c.ts".to_string()]);
    assert_eq!(low.files, vec!["a.ts".to_string()]);
}

#[test]
fn a_job_left_with_no_files_after_disjointness_is_dropped() {
    let jobs = vec![
        job("high", &["a.ts"], Priority::High),
        job("low", &["a.ts"], Priority::Low),
    ];
    let result = enforce_disjointness(jobs);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "high");
}

#[test]
fn parallelism_cap_truncates_to_highest_priority_jobs() {
    let jobs = vec![
        job("a", &["a.ts"], Priority::Low),
        job("b", &["b.ts"], Priority::High),
        job("c", &["c.ts"], Priority::Medium),
    ];
    let result = enforce_parallelism_cap(jobs, 2);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, "b");
    assert_eq!(result[1].id, "c");
}

#[test]
fn record_dispatch_marks_dispatched_when_any_job_succeeds() {
    let mut cascade = Cascade::new(
        CascadeId::new("casc_1"),
        None,
        vec!["core.ts".to_string()],
        vec!["a.ts".to_string()],
        2,
        "blast radius from core.ts",
        1_000,
    );
    cascade.record_dispatch(
        CascadeTelemetry {
            dispatch_latency_ms: 12,
            conflict_count: 1,
            dispatched_count: 1,
            failed_count: 1,
        },
        1_100,
    );
    assert_eq!(cascade.status, CascadeStatus::Dispatched);
}

#[test]
fn record_dispatch_marks_failed_when_nothing_dispatched() {
    let mut cascade = Cascade::new(
        CascadeId::new("casc_1"),
        None,
        vec![],
        vec![],
        0,
        "",
        1_000,
    );
    cascade.record_dispatch(CascadeTelemetry::default(), 1_100);
    assert_eq!(cascade.status, CascadeStatus::Failed);
}
