// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::cli;

#[test]
fn top_level_help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("goal")
        .stdout_has("session")
        .stdout_has("lock")
        .stdout_has("cascade")
        .stdout_has("orchestrator");
}

#[test]
fn version_flag_prints_version() {
    cli().args(&["--version"]).passes().stdout_has("relay");
}

#[test]
fn goal_help_lists_subcommands() {
    cli()
        .args(&["goal", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("show")
        .stdout_has("create")
        .stdout_has("update")
        .stdout_has("delete")
        .stdout_has("re-audit");
}

#[test]
fn session_help_lists_subcommands() {
    cli()
        .args(&["session", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("terminate");
}

#[test]
fn lock_help_lists_subcommands() {
    cli()
        .args(&["lock", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("purge");
}

#[test]
fn cascade_help_lists_subcommands() {
    cli().args(&["cascade", "--help"]).passes().stdout_has("analyze");
}

#[test]
fn orchestrator_help_lists_subcommands() {
    cli()
        .args(&["orchestrator", "--help"])
        .passes()
        .stdout_has("batch")
        .stdout_has("sync");
}

#[test]
fn no_arguments_shows_usage_error() {
    cli().args(&[]).fails().stderr_has("Usage");
}
