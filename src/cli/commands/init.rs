//! Implementation of the `xp-ledger init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::PROJECT_CONFIG_PATH;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: Option<PathBuf>,
    pub database_path: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(path) = &self.config_path {
            lines.push(format!("  config:   {}", path.display()));
        }
        lines.push(format!("  database: {}", self.database_path));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config_path = Path::new(PROJECT_CONFIG_PATH);
    let written = write_default_config(config_path, args.force).await?;

    initialize_database(&config.database)
        .await
        .context("Failed to initialize database")?;

    let message = match (written, args.force) {
        (true, true) => "Configuration rewritten and database ready.",
        (true, false) => "Project initialized.",
        (false, _) => "Configuration already exists (use --force to overwrite); database ready.",
    };

    output(
        &InitOutput {
            success: true,
            message: message.to_string(),
            config_path: written.then(|| config_path.to_path_buf()),
            database_path: config.database.path.clone(),
        },
        json_mode,
    );
    Ok(())
}

/// Write the default configuration to `path`. Returns false when the file
/// exists and `force` is unset.
async fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default configuration")?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
