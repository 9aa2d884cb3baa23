//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Badger - package badge resolution with a content-addressed cache
///
/// Resolves badge artifacts for packages in an npm-compatible registry
/// and caches them locally.
#[derive(Parser, Debug)]
#[command(name = "badger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BADGER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a badge artifact for a package
    Resolve(ResolveArgs),

    /// Manage the artifact cache
    Cache(CacheArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Package name, scope included (`pkg` or `@scope/pkg`)
    pub package: String,

    /// Artifact to resolve (e.g. cov.svg)
    #[arg(short, long)]
    pub badge: String,

    /// Write the artifact here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Registry base URL (overrides config)
    #[arg(long)]
    pub registry: Option<String>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache management actions
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove every cached artifact
    Clear,

    /// Run an integrity sweep over the store
    Verify,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_parses_scoped_package() {
        let cli = Cli::parse_from(["badger", "resolve", "@scope/pkg", "--badge", "cov.svg"]);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.package, "@scope/pkg");
                assert_eq!(args.badge, "cov.svg");
                assert!(args.output.is_none());
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn cache_actions_parse() {
        let cli = Cli::parse_from(["badger", "cache", "verify"]);
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                action: CacheAction::Verify
            })
        ));
    }
}
