// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn default_server_url_falls_back_when_unset() {
    std::env::remove_var("RELAY_SERVER_URL");
    assert_eq!(default_server_url(), "http://127.0.0.1:8080");
}

#[test]
#[serial]
fn default_server_url_prefers_environment() {
    std::env::set_var("RELAY_SERVER_URL", "http://relay.internal:9090");
    assert_eq!(default_server_url(), "http://relay.internal:9090");
    std::env::remove_var("RELAY_SERVER_URL");
}

#[test]
fn cli_parses_goal_list() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
