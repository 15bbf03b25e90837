use super::*;
use crate::agent::{AgentStatus, CreateAgentRequest};
use crate::auditor::{DecomposeInput, ReviewInput};
use mockito::Server;

#[tokio::test]
async fn create_agent_posts_and_decodes_the_response() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/agents")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"agent-1","url":"https://agents.example.com/agent-1"}"#)
        .create_async()
        .await;

    let provider = HttpAgentProvider::new(server.url(), "test-key");
    let created = provider
        .create_agent(CreateAgentRequest {
            prompt: "fix it".to_string(),
            source_repo: "acme/widgets".to_string(),
            starting_branch: "main".to_string(),
            context: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id, "agent-1");
}

#[tokio::test]
async fn get_agent_flattens_the_nested_outputs_shape() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/agents/agent-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status":"COMPLETED","url":"https://agents.example.com/agent-1",
                "outputs":{"change_proposal":{"url":"https://example.com/pr/9"}}}"#,
        )
        .create_async()
        .await;

    let provider = HttpAgentProvider::new(server.url(), "test-key");
    let report = provider.get_agent("agent-1").await.unwrap();

    assert_eq!(report.status, AgentStatus::Completed);
    assert_eq!(report.change_proposal_url.as_deref(), Some("https://example.com/pr/9"));
}

#[tokio::test]
async fn rate_limited_response_carries_the_reset_header() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/agents/agent-1")
        .with_status(429)
        .with_header("x-ratelimit-reset", "12345")
        .create_async()
        .await;

    let provider = HttpAgentProvider::new(server.url(), "test-key");
    let err = provider.get_agent("agent-1").await.unwrap_err();

    match err {
        ProviderError::RateLimited { reset_at_ms } => assert_eq!(reset_at_ms, 12345),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_becomes_an_http_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/agents/missing")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let provider = HttpAgentProvider::new(server.url(), "test-key");
    let err = provider.get_agent("missing").await.unwrap_err();

    assert!(matches!(err, ProviderError::Http(_)));
}

#[tokio::test]
async fn get_commit_diff_unwraps_the_diff_field() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/acme/widgets/commits/abc123/diff")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"diff":"diff --git a/x b/x"}"#)
        .create_async()
        .await;

    let provider = HttpVcsProvider::new(server.url(), "test-key");
    let diff = provider
        .get_commit_diff("acme", "widgets", "abc123")
        .await
        .unwrap();

    assert_eq!(diff, "diff --git a/x b/x");
}

#[tokio::test]
async fn post_pull_request_comment_sends_the_body_as_json() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/repos/acme/widgets/pulls/42/comments")
        .match_body(mockito::Matcher::Json(serde_json::json!({"body": "looks good"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let provider = HttpVcsProvider::new(server.url(), "test-key");
    provider
        .post_pull_request_comment("acme", "widgets", 42, "looks good")
        .await
        .unwrap();
}

#[tokio::test]
async fn decompose_round_trips_through_the_oracle() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/decompose")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"is_cascade":true,"core_files_changed":[],"downstream_files":[],
                "repair_jobs":[],"summary":"cascading change","confidence":0.9}"#,
        )
        .create_async()
        .await;

    let oracle = HttpAuditorOracle::new(server.url(), "test-key");
    let analysis = oracle
        .decompose(DecomposeInput {
            core_file_diffs: vec![],
            changed_paths: vec!["src/a.rs".to_string()],
        })
        .await
        .unwrap();

    assert!(analysis.is_cascade);
    assert_eq!(analysis.confidence, 0.9);
}

#[tokio::test]
async fn review_surfaces_a_malformed_response_as_an_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/review")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create_async()
        .await;

    let oracle = HttpAuditorOracle::new(server.url(), "test-key");
    let err = oracle
        .review(ReviewInput {
            source_repo: "acme/widgets".to_string(),
            branch_name: "agent/fix-1".to_string(),
            commit: "abc123".to_string(),
            criteria: vec![],
            diff: "diff".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Malformed(_)));
}
