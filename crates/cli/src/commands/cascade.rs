// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cascade command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_server::dto::{CascadeAnalyzeRequest, CascadeResponseDto, CoreFileDiffDto};

use crate::client::RelayClient;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct CascadeArgs {
    #[command(subcommand)]
    pub command: CascadeCommand,
}

#[derive(Subcommand)]
pub enum CascadeCommand {
    /// Decompose core-file diffs into repair jobs and dispatch them
    Analyze {
        /// Changed file path (can be repeated)
        #[arg(long = "changed-path")]
        changed_path: Vec<String>,
        /// `path=diff-file` pair: reads the diff text from disk (can be repeated)
        #[arg(long = "core-diff", value_parser = parse_core_diff)]
        core_diff: Vec<(String, String)>,
        /// The session whose merge triggered this analysis, if any
        #[arg(long)]
        trigger_session: Option<String>,
        /// Goal to attach the resulting cascade to
        #[arg(long)]
        goal: Option<String>,
    },
}

fn parse_core_diff(s: &str) -> Result<(String, String), String> {
    let (path, diff_file) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid --core-diff '{s}': expected path=diff-file"))?;
    let diff = std::fs::read_to_string(diff_file)
        .map_err(|e| format!("failed to read diff file '{diff_file}': {e}"))?;
    Ok((path.to_string(), diff))
}

pub async fn handle(command: CascadeCommand, client: &RelayClient, format: OutputFormat) -> Result<()> {
    match command {
        CascadeCommand::Analyze { changed_path, core_diff, trigger_session, goal } => {
            let req = CascadeAnalyzeRequest {
                core_file_diffs: core_diff
                    .into_iter()
                    .map(|(path, diff)| CoreFileDiffDto { path, diff })
                    .collect(),
                changed_paths: changed_path,
                trigger_session_id: trigger_session,
                goal_id: goal,
            };
            let resp = client.cascade_analyze(&req).await?;
            match format {
                OutputFormat::Json => print_json(&resp)?,
                OutputFormat::Text => print_cascade_response(&resp),
            }
        }
    }
    Ok(())
}

fn print_cascade_response(resp: &CascadeResponseDto) {
    match resp {
        CascadeResponseDto::Conflict { conflicts } => {
            println!("blocked by {} lock conflict(s):", conflicts.len());
            for c in conflicts {
                println!("  {} held by {}", c.path, c.held_by);
            }
        }
        CascadeResponseDto::Dispatched { cascade_id, cascade_status, telemetry, dispatched_sessions } => {
            println!("cascade {cascade_id} dispatched ({cascade_status})");
            println!(
                "  {} session(s), {} conflict(s) skipped, {} failed, {}ms",
                dispatched_sessions.len(),
                telemetry.conflict_count,
                telemetry.failed_count,
                telemetry.dispatch_latency_ms
            );
        }
        CascadeResponseDto::NotDispatched { cascade_id } => {
            println!("cascade {cascade_id} analyzed but not dispatched");
        }
    }
}
