use super::*;
use std::collections::HashMap;

fn goal() -> Goal {
    Goal::new(
        GoalId::new("goal_1"),
        "ship the thing",
        "",
        vec![
            AcceptanceCriterion::new("c1", "tests pass"),
            AcceptanceCriterion::new("c2", "docs updated"),
        ],
        1_000,
    )
}

#[test]
fn criterion_ids_survive_a_merge_that_omits_them() {
    let mut g = goal();
    let mut assessment = HashMap::new();
    assessment.insert(
        "c1".to_string(),
        CriterionAssessment {
            met: true,
            reasoning: Some("passed in CI".to_string()),
            evidence_files: vec!["tests/a.rs".to_string()],
        },
    );
    g.merge_criteria_assessment(&assessment, 2_000);

    assert!(g.criterion("c1").unwrap().met);
    assert!(!g.criterion("c2").unwrap().met);
    assert_eq!(g.criteria.len(), 2);
}

#[test]
fn unknown_criterion_lookup_errors_without_panicking() {
    let g = goal();
    assert!(matches!(
        g.criterion("nope"),
        Err(DomainError::UnknownCriterion(_))
    ));
}

#[test]
fn review_artifact_add_is_idempotent_on_url_and_agent_id() {
    let mut g = goal();
    let artifact = ReviewArtifact {
        url: "https://example.com/pr/1".to_string(),
        session_id: crate::session::SessionId::new("sess_1"),
        external_agent_id: Some("agent-9".to_string()),
    };
    g.add_review_artifact(artifact.clone(), 1_100);
    g.add_review_artifact(artifact, 1_200);
    assert_eq!(g.review_artifacts.len(), 1);
}

#[test]
fn all_criteria_met_is_false_until_every_criterion_is_met() {
    let mut g = goal();
    assert!(!g.all_criteria_met());
    for c in &mut g.criteria {
        c.met = true;
    }
    assert!(g.all_criteria_met());
}

#[test]
fn synthetic_goal_turns_repair_prompts_into_criteria() {
    let prompts = vec!["fix the router".to_string(), "fix the tests".to_string()];
    let g = Goal::new_synthetic(GoalId::new("goal_synth"), &prompts, 1_000);
    assert!(g.synthetic);
    assert_eq!(g.criteria.len(), 2);
    assert_eq!(g.criteria[0].text, "fix the router");
}
