// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_server::dto::LockDto;

use crate::client::RelayClient;
use crate::output::{format_time_ago, print_json, OutputFormat};

#[derive(Args)]
pub struct LockArgs {
    #[command(subcommand)]
    pub command: LockCommand,
}

#[derive(Subcommand)]
pub enum LockCommand {
    /// List held file locks
    List {},
    /// Release every held lock (operator escape hatch for stuck sessions)
    Purge,
}

pub async fn handle(command: LockCommand, client: &RelayClient, format: OutputFormat) -> Result<()> {
    match command {
        LockCommand::List {} => {
            let resp = client.list_locks().await?;
            match format {
                OutputFormat::Json => print_json(&resp.locks)?,
                OutputFormat::Text => print_lock_table(&resp.locks),
            }
        }
        LockCommand::Purge => {
            let resp = client.purge_locks().await?;
            println!("released {} lock(s)", resp.released_count);
        }
    }
    Ok(())
}

fn print_lock_table(locks: &[LockDto]) {
    if locks.is_empty() {
        println!("No locks held");
        return;
    }
    println!("{:<40} {:<12} AGE", "PATH", "SESSION");
    for l in locks {
        println!("{:<40} {:<12} {}", l.path, short(&l.session_id), format_time_ago(l.locked_at_ms));
    }
}

fn short(id: &str) -> &str {
    if id.len() > 10 {
        &id[..10]
    } else {
        id
    }
}
