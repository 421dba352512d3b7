//! User CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::open_service;
use crate::cli::output::{list_table, output, progress_bar, signed, CommandOutput};
use crate::domain::models::{Config, LedgerEntry, RankProgress};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show XP and rank
    Show {
        /// External user id
        user: String,
    },
    /// Credit XP to a user
    AddXp {
        /// External user id
        user: String,
        /// Positive amount of XP
        amount: i64,
        /// Reason recorded in the ledger
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Debit XP from a user (never below zero)
    RemoveXp {
        /// External user id
        user: String,
        /// Positive amount of XP
        amount: i64,
        /// Reason recorded in the ledger
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Show recent XP movements
    History {
        /// External user id
        user: String,
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct UserOutput {
    pub user: String,
    pub known: bool,
    pub xp: i64,
    #[serde(flatten)]
    pub progress: RankProgress,
}

impl CommandOutput for UserOutput {
    fn to_human(&self) -> String {
        if !self.known {
            return format!("{} has no XP yet ({})", self.user, self.progress.rank);
        }
        let mut lines = vec![format!("{}: {} XP, rank {}", self.user, self.xp, self.progress.rank)];
        match self.progress.next_milestone {
            Some(next) => lines.push(format!(
                "  {} {} XP to go (next rank at {next})",
                progress_bar(self.progress.level_progress, 20),
                self.progress.progress_to_next
            )),
            None => lines.push("  top rank reached".to_string()),
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct BalanceOutput {
    pub user: String,
    pub xp: i64,
    pub message: String,
}

impl CommandOutput for BalanceOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryOutput {
    pub user: String,
    pub entries: Vec<LedgerEntry>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return format!("No XP history for {}.", self.user);
        }

        let mut table = list_table(&["when", "delta", "balance", "reason"]);
        for entry in &self.entries {
            table.add_row(vec![
                entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
                signed(entry.delta),
                entry.balance_after.to_string(),
                entry.reason.clone(),
            ]);
        }
        format!("XP history for {} ({} entries):\n{table}", self.user, self.entries.len())
    }
}

pub async fn execute(args: UserArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;

    match args.command {
        UserCommands::Show { user } => {
            let found = service
                .find_user(&user)
                .await
                .with_context(|| format!("Failed to load user {user}"))?;
            let xp = found.as_ref().map_or(0, |u| u.xp);
            output(
                &UserOutput {
                    user,
                    known: found.is_some(),
                    xp,
                    progress: service.get_rank_and_progress(xp),
                },
                json_mode,
            );
        }
        UserCommands::AddXp { user, amount, reason } => {
            let xp = service
                .add_xp(&user, amount, &reason)
                .await
                .with_context(|| format!("Failed to add XP to {user}"))?;
            let message = format!("Added {amount} XP to {user}; total {xp} XP");
            output(&BalanceOutput { user, xp, message }, json_mode);
        }
        UserCommands::RemoveXp { user, amount, reason } => {
            let xp = service
                .remove_xp(&user, amount, &reason)
                .await
                .with_context(|| format!("Failed to remove XP from {user}"))?;
            let message = format!("Removed up to {amount} XP from {user}; total {xp} XP");
            output(&BalanceOutput { user, xp, message }, json_mode);
        }
        UserCommands::History { user, limit } => {
            let entries = service
                .xp_history(&user, limit)
                .await
                .with_context(|| format!("Failed to load history of {user}"))?;
            output(&HistoryOutput { user, entries }, json_mode);
        }
    }

    Ok(())
}
