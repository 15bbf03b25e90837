// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator command handlers: batch dispatch and external-status sync.

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_server::dto::{OrchestratorBatchRequest, RepairJobDto, SyncBatchRequest, SyncRequest};
use std::path::PathBuf;

use crate::client::RelayClient;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct OrchestratorArgs {
    #[command(subcommand)]
    pub command: OrchestratorCommand,
}

#[derive(Subcommand)]
pub enum OrchestratorCommand {
    /// Dispatch a batch of repair jobs read from a JSON file
    Batch {
        /// Path to a JSON file containing an array of repair jobs
        jobs_file: PathBuf,
        /// Goal to attach the dispatched sessions to
        #[arg(long)]
        goal: Option<String>,
    },
    /// Poll the external agent for one session's latest status
    Sync {
        /// Session ID
        session_id: String,
    },
    /// Poll the external agent for several sessions' latest status
    SyncBatch {
        /// Session IDs
        session_ids: Vec<String>,
    },
}

pub async fn handle(command: OrchestratorCommand, client: &RelayClient, format: OutputFormat) -> Result<()> {
    match command {
        OrchestratorCommand::Batch { jobs_file, goal } => {
            let raw = std::fs::read_to_string(&jobs_file)?;
            let jobs: Vec<RepairJobDto> = serde_json::from_str(&raw)?;
            let req = OrchestratorBatchRequest { goal_id: goal, jobs };
            let resp = client.orchestrator_batch(&req).await?;
            match format {
                OutputFormat::Json => print_json(&resp)?,
                OutputFormat::Text => {
                    println!(
                        "batch {}: {} dispatched, {} failed",
                        resp.batch_id, resp.dispatched_count, resp.failed_count
                    );
                    if let Some(conflicts) = &resp.lock_conflicts {
                        for c in conflicts {
                            println!("  conflict: {} held by {}", c.path, c.held_by);
                        }
                    }
                }
            }
        }
        OrchestratorCommand::Sync { session_id } => {
            let resp = client.sync(&SyncRequest { session_id }).await?;
            match format {
                OutputFormat::Json => print_json(&resp)?,
                OutputFormat::Text => println!("external status: {}", resp.external_status),
            }
        }
        OrchestratorCommand::SyncBatch { session_ids } => {
            let resp = client.sync_batch(&SyncBatchRequest { session_ids }).await?;
            match format {
                OutputFormat::Json => print_json(&resp)?,
                OutputFormat::Text => {
                    for r in &resp.results {
                        match &r.error {
                            Some(err) => println!("{}: error ({err})", r.session_id),
                            None => println!("{}: {}", r.session_id, r.external_status),
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
