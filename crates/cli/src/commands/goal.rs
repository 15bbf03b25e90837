// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use relay_server::dto::{AcceptanceCriterionDto, CreateGoalRequest, GoalDto, UpdateGoalRequest};

use crate::client::RelayClient;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub command: GoalCommand,
}

#[derive(Subcommand)]
pub enum GoalCommand {
    /// List all goals
    List {},
    /// Show a single goal
    Show {
        /// Goal ID
        id: String,
    },
    /// Create a new goal
    Create {
        /// Goal title
        title: String,
        /// Goal description
        #[arg(long, default_value = "")]
        description: String,
        /// Acceptance criterion text (can be repeated)
        #[arg(long = "criterion")]
        criterion: Vec<String>,
    },
    /// Replace a goal's title, description, and criteria
    Update {
        /// Goal ID
        id: String,
        /// Goal title
        title: String,
        /// Goal description
        #[arg(long, default_value = "")]
        description: String,
        /// Acceptance criterion text (can be repeated)
        #[arg(long = "criterion")]
        criterion: Vec<String>,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
    /// Trigger the Auditor oracle to re-score a goal's acceptance criteria
    ReAudit {
        /// Goal ID
        id: String,
    },
}

fn criteria_from_text(criterion: Vec<String>) -> Vec<AcceptanceCriterionDto> {
    criterion
        .into_iter()
        .enumerate()
        .map(|(i, text)| AcceptanceCriterionDto {
            id: format!("ac-{}", i + 1),
            text,
            met: false,
            reasoning: None,
            evidence_files: Vec::new(),
        })
        .collect()
}

pub async fn handle(command: GoalCommand, client: &RelayClient, format: OutputFormat) -> Result<()> {
    match command {
        GoalCommand::List {} => {
            let resp = client.list_goals().await?;
            match format {
                OutputFormat::Json => print_json(&resp.goals)?,
                OutputFormat::Text => print_goal_table(&resp.goals),
            }
        }
        GoalCommand::Show { id } => {
            let goal = client.get_goal(&id).await?;
            match format {
                OutputFormat::Json => print_json(&goal)?,
                OutputFormat::Text => print_goal_detail(&goal),
            }
        }
        GoalCommand::Create { title, description, criterion } => {
            let req = CreateGoalRequest { title, description, criteria: criteria_from_text(criterion) };
            let goal = client.create_goal(&req).await?;
            println!("created goal {}", goal.id);
        }
        GoalCommand::Update { id, title, description, criterion } => {
            let req = UpdateGoalRequest { title, description, criteria: criteria_from_text(criterion) };
            let goal = client.update_goal(&id, &req).await?;
            println!("updated goal {}", goal.id);
        }
        GoalCommand::Delete { id } => {
            client.delete_goal(&id).await?;
            println!("deleted goal {id}");
        }
        GoalCommand::ReAudit { id } => {
            let resp = client.re_audit_goal(&id).await?;
            println!("goal {id} re-audit outcome: {}", resp.outcome);
        }
    }
    Ok(())
}

fn print_goal_table(goals: &[GoalDto]) {
    if goals.is_empty() {
        println!("No goals");
        return;
    }
    println!("{:<12} {:<10} {:<8} TITLE", "ID", "STATUS", "SYNTH");
    for g in goals {
        println!("{:<12} {:<10} {:<8} {}", short(&g.id), g.status, g.synthetic, g.title);
    }
}

fn print_goal_detail(g: &GoalDto) {
    println!("id:          {}", g.id);
    println!("title:       {}", g.title);
    println!("description: {}", g.description);
    println!("status:      {}", g.status);
    println!("synthetic:   {}", g.synthetic);
    println!("criteria:");
    for c in &g.criteria {
        println!("  [{}] {} - {}", if c.met { "x" } else { " " }, c.id, c.text);
    }
}

fn short(id: &str) -> &str {
    if id.len() > 10 {
        &id[..10]
    } else {
        id
    }
}

#[cfg(test)]
#[path = "goal_tests.rs"]
mod tests;
