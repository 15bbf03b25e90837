// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn url_joins_base_and_path_without_double_slash() {
    let client = RelayClient::new("http://127.0.0.1:8080/");
    assert_eq!(client.url("/goals"), "http://127.0.0.1:8080/goals");
}

#[test]
fn url_handles_base_without_trailing_slash() {
    let client = RelayClient::new("http://127.0.0.1:8080");
    assert_eq!(client.url("/sessions"), "http://127.0.0.1:8080/sessions");
}

#[test]
fn extract_error_message_reads_error_field() {
    let body = r#"{"error": "goal missing"}"#;
    assert_eq!(extract_error_message(body), "goal missing");
}

#[test]
fn extract_error_message_falls_back_to_conflicts() {
    let body = r#"{"conflicts": [{"path": "a.rs", "held_by": "sess_1"}]}"#;
    assert!(extract_error_message(body).contains("a.rs"));
}

#[test]
fn extract_error_message_falls_back_to_raw_body_when_not_json() {
    assert_eq!(extract_error_message("not json"), "not json");
}
