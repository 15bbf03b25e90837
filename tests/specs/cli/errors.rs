// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::cli;

#[test]
fn unknown_subcommand_reports_error() {
    cli()
        .args(&["nonexistent"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn unknown_goal_subcommand_reports_error() {
    cli()
        .args(&["goal", "nonexistent"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn goal_show_without_id_reports_missing_argument() {
    cli()
        .args(&["goal", "show"])
        .fails()
        .stderr_has("required");
}

#[test]
fn goal_create_without_title_reports_missing_argument() {
    cli()
        .args(&["goal", "create"])
        .fails()
        .stderr_has("required");
}

#[test]
fn session_terminate_without_id_reports_missing_argument() {
    cli()
        .args(&["session", "terminate"])
        .fails()
        .stderr_has("required");
}

#[test]
fn orchestrator_batch_without_jobs_file_reports_missing_argument() {
    cli()
        .args(&["orchestrator", "batch"])
        .fails()
        .stderr_has("required");
}

#[test]
fn unknown_flag_reports_error() {
    cli()
        .args(&["goal", "list", "--bogus-flag"])
        .fails()
        .stderr_has("unexpected argument");
}
