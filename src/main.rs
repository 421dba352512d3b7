//! xp-ledger CLI entry point.

use anyhow::Result;
use clap::Parser;

use xp_ledger::cli::{commands, handle_error, Cli, Commands};
use xp_ledger::domain::models::Config;
use xp_ledger::infrastructure::config::ConfigLoader;
use xp_ledger::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json_mode: bool) -> Result<()> {
    let config: Config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Init(args) => commands::init::execute(args, &config, json_mode).await,
        Commands::Attempt(args) => commands::attempt::execute(args, &config, json_mode).await,
        Commands::Problem(args) => commands::problem::execute(args, &config, json_mode).await,
        Commands::User(args) => commands::user::execute(args, &config, json_mode).await,
    }
}
