//! Badger - package badge resolution CLI
//!
//! Entry point that dispatches to subcommands.

use badger::cli::{Cli, Commands};
use badger::config::ConfigManager;
use badger::error::BadgerResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BadgerResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("badger=warn"),
        1 => EnvFilter::new("badger=info"),
        _ => EnvFilter::new("badger=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    match cli.command {
        Commands::Resolve(args) => badger::cli::commands::resolve(args, &manager, &config).await,
        Commands::Cache(args) => badger::cli::commands::cache(args, &manager, &config).await,
    }
}
