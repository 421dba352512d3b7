//! CLI command implementations.

pub mod attempt;
pub mod init;
pub mod problem;
pub mod user;

use anyhow::{Context, Result};

use crate::adapters::sqlite::initialize_database;
use crate::domain::models::Config;
use crate::services::ScoringService;

/// Open the configured database and wire the scoring service onto it.
pub async fn open_service(config: &Config) -> Result<ScoringService> {
    let pool = initialize_database(&config.database)
        .await
        .with_context(|| format!("Failed to open database at {}. Run 'xp-ledger init' first.", config.database.path))?;
    ScoringService::from_config(pool, config).context("Failed to set up problem source")
}
