//! Implementation of the `xp-ledger attempt` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use super::open_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AttemptResult, Config};

#[derive(Args, Debug)]
pub struct AttemptArgs {
    /// External id of the submitting user
    pub user: String,

    /// Problem number (a leading '#' is accepted)
    pub problem: String,

    /// The submission was correct
    #[arg(long)]
    pub correct: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct AttemptOutput {
    pub user: String,
    pub problem: String,
    pub correct: bool,
    #[serde(flatten)]
    pub result: AttemptResult,
}

impl CommandOutput for AttemptOutput {
    fn to_human(&self) -> String {
        let r = &self.result;
        let verdict = if self.correct {
            style("correct").green().to_string()
        } else {
            style("wrong").red().to_string()
        };

        let mut lines = vec![format!(
            "{} on problem {}: {} (attempt #{})",
            self.user, self.problem, verdict, r.attempt_number
        )];
        if r.awarded_xp > 0 {
            lines.push(format!("  awarded {} XP, total {} XP", style(r.awarded_xp).bold(), r.user_xp));
        }
        lines.push(format!(
            "  problem: {} attempts, {} solves, weighted {:.2}",
            r.total_problem_attempts, r.total_problem_solves, r.weighted_solves
        ));
        lines.push(format!(
            "  base score: {} (original {})",
            r.current_base_score, r.original_base_score
        ));
        lines.join("\n")
    }
}

pub async fn execute(args: AttemptArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;
    let result = service
        .record_attempt(&args.user, &args.problem, args.correct)
        .await
        .with_context(|| format!("Failed to record attempt on problem {}", args.problem))?;

    output(
        &AttemptOutput {
            user: args.user,
            problem: args.problem.trim_start_matches('#').to_string(),
            correct: args.correct,
            result,
        },
        json_mode,
    );
    Ok(())
}
