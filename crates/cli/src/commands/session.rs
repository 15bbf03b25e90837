// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_server::dto::SessionDto;

use crate::client::RelayClient;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List active sessions
    List {},
    /// Force-terminate a session, releasing its locks
    Terminate {
        /// Session ID
        id: String,
    },
}

pub async fn handle(command: SessionCommand, client: &RelayClient, format: OutputFormat) -> Result<()> {
    match command {
        SessionCommand::List {} => {
            let resp = client.list_sessions().await?;
            match format {
                OutputFormat::Json => print_json(&resp.sessions)?,
                OutputFormat::Text => print_session_table(&resp.sessions),
            }
        }
        SessionCommand::Terminate { id } => {
            let resp = client.terminate_session(&id).await?;
            println!("terminated session {} (success={})", resp.session_id, resp.success);
        }
    }
    Ok(())
}

fn print_session_table(sessions: &[SessionDto]) {
    if sessions.is_empty() {
        println!("No active sessions");
        return;
    }
    println!("{:<12} {:<12} {:<20} BRANCH", "ID", "STATUS", "GOAL");
    for s in sessions {
        let goal = s.goal_id.as_deref().unwrap_or("-");
        println!("{:<12} {:<12?} {:<20} {}", short(&s.id), s.status, goal, s.branch_name);
    }
}

fn short(id: &str) -> &str {
    if id.len() > 10 {
        &id[..10]
    } else {
        id
    }
}
