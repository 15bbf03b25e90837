use super::*;
use crate::state::{AppState, ProdEngine};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use relay_core::{SystemClock, UuidIdGen};
use relay_engine::Engine;
use relay_providers::http::{HttpAgentProvider, HttpAuditorOracle, HttpVcsProvider};
use relay_providers::Traced;
use relay_storage::Registry;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn test_state(dir: &std::path::Path) -> AppState {
    let registry = Arc::new(Registry::open(&dir.join("wal.jsonl"), &dir.join("snapshot.json")).unwrap());
    let engine: ProdEngine = Engine::new(
        registry,
        Traced::new(HttpAuditorOracle::new("https://auditor.example", "key"), "auditor"),
        Traced::new(HttpAgentProvider::new("https://agents.example", "key"), "agent"),
        Traced::new(HttpVcsProvider::new("https://vcs.example", "key"), "vcs"),
        SystemClock,
        UuidIdGen,
        relay_engine::EngineConfig::default(),
    );
    AppState::new(Arc::new(engine), "test-secret")
}

#[tokio::test]
async fn goals_list_starts_empty() {
    let dir = tempdir().unwrap();
    let router = build_router(test_state(dir.path()));
    let response = router
        .oneshot(Request::builder().uri("/goals").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_goal_returns_404() {
    let dir = tempdir().unwrap();
    let router = build_router(test_state(dir.path()));
    let response = router
        .oneshot(Request::builder().uri("/goals/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let dir = tempdir().unwrap();
    let router = build_router(test_state(dir.path()));
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/vcs")
                .header("x-github-event", "push")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn locks_list_starts_empty() {
    let dir = tempdir().unwrap();
    let router = build_router(test_state(dir.path()));
    let response = router
        .oneshot(Request::builder().uri("/locks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
