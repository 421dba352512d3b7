//! Problem CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::open_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    Config, FinalizeProblemResult, ProblemStats, ResetProblemResult, UnfinalizeProblemResult,
};

#[derive(Args, Debug)]
pub struct ProblemArgs {
    #[command(subcommand)]
    pub command: ProblemCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProblemCommands {
    /// Show a problem's scoring state
    Show {
        /// Problem number
        problem: String,
    },
    /// Freeze the base score and re-price every solver's award
    Finalize {
        /// Problem number
        problem: String,
    },
    /// Undo the last finalize
    Unfinalize {
        /// Problem number
        problem: String,
    },
    /// Delete all attempts of a problem; XP balances are kept
    Reset {
        /// Problem number
        problem: String,
    },
}

impl CommandOutput for ProblemStats {
    fn to_human(&self) -> String {
        let p = &self.problem;
        let state = match p.finalized_at {
            Some(at) if p.is_finalized => format!("finalized at {}", at.format("%Y-%m-%d %H:%M UTC")),
            _ => "open".to_string(),
        };
        [
            format!("Problem {}", p.number),
            format!("  state:          {state}"),
            format!("  base score:     {} (original {})", p.base_score, p.original_base_score),
            format!("  attempts:       {}", p.attempts),
            format!("  solves:         {}", p.solves),
            format!("  weighted:       {:.2}", self.weighted_solves),
        ]
        .join("\n")
    }
}

impl CommandOutput for FinalizeProblemResult {
    fn to_human(&self) -> String {
        let mut line = format!(
            "Finalized problem {} at base score {} (weighted solves {:.2}); {} user(s) adjusted",
            self.problem_number, self.final_base_score, self.weighted_solves, self.adjusted_users
        );
        if self.initialized_users > 0 {
            line.push_str(&format!(", {} legacy award(s) priced", self.initialized_users));
        }
        line
    }
}

impl CommandOutput for UnfinalizeProblemResult {
    fn to_human(&self) -> String {
        format!(
            "Unfinalized problem {}; base score back to {}, {} user(s) reverted",
            self.problem_number, self.restored_base_score, self.reverted_users
        )
    }
}

impl CommandOutput for ResetProblemResult {
    fn to_human(&self) -> String {
        format!(
            "Reset problem {}: cleared {} attempt row(s), base score {} (original {})",
            self.problem_number, self.cleared_user_attempts, self.current_base_score, self.original_base_score
        )
    }
}

pub async fn execute(args: ProblemArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;

    match args.command {
        ProblemCommands::Show { problem } => {
            let stats = service
                .problem_stats(&problem)
                .await
                .with_context(|| format!("Failed to load problem {problem}"))?;
            output(&stats, json_mode);
        }
        ProblemCommands::Finalize { problem } => {
            let result = service
                .finalize_problem_scoring(&problem)
                .await
                .with_context(|| format!("Failed to finalize problem {problem}"))?;
            output(&result, json_mode);
        }
        ProblemCommands::Unfinalize { problem } => {
            let result = service
                .unfinalize_problem_scoring(&problem)
                .await
                .with_context(|| format!("Failed to unfinalize problem {problem}"))?;
            output(&result, json_mode);
        }
        ProblemCommands::Reset { problem } => {
            let result = service
                .reset_problem_stats(&problem)
                .await
                .with_context(|| format!("Failed to reset problem {problem}"))?;
            output(&result, json_mode);
        }
    }

    Ok(())
}
