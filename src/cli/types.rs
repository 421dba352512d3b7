//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{attempt::AttemptArgs, init::InitArgs, problem::ProblemArgs, user::UserArgs};

#[derive(Parser, Debug)]
#[command(name = "xp-ledger")]
#[command(about = "Problem scoring and XP ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .xp-ledger/
    #[arg(short, long, global = true, env = "XP_LEDGER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration and create the database
    Init(InitArgs),

    /// Record one submission of a problem
    Attempt(AttemptArgs),

    /// Inspect, finalize, unfinalize or reset a problem
    Problem(ProblemArgs),

    /// Inspect and adjust user XP
    User(UserArgs),
}
