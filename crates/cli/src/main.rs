// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `relay` - command-line client for the `relayd` control plane.

mod client;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{cascade, goal, lock, orchestrator, session};

use crate::client::RelayClient;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "relay", version, about = "Control-plane client for relayd")]
struct Cli {
    /// Base URL of the relayd HTTP server
    #[arg(long, global = true, default_value_t = default_server_url())]
    server: String,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn default_server_url() -> String {
    std::env::var("RELAY_SERVER_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Goal management
    Goal(goal::GoalArgs),
    /// Session management
    Session(session::SessionArgs),
    /// Lock management
    Lock(lock::LockArgs),
    /// Cascade analysis and dispatch
    Cascade(cascade::CascadeArgs),
    /// Batch dispatch and external-status sync
    Orchestrator(orchestrator::OrchestratorArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RelayClient::new(cli.server);

    match cli.command {
        Commands::Goal(args) => goal::handle(args.command, &client, cli.output).await,
        Commands::Session(args) => session::handle(args.command, &client, cli.output).await,
        Commands::Lock(args) => lock::handle(args.command, &client, cli.output).await,
        Commands::Cascade(args) => cascade::handle(args.command, &client, cli.output).await,
        Commands::Orchestrator(args) => orchestrator::handle(args.command, &client, cli.output).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
