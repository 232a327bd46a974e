//! Command-line interface for dealscope.

pub mod analyze;
pub mod cache;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Startup analysis pipeline with cached completion calls
#[derive(Debug, Parser)]
#[command(name = "dealscope", version, about)]
pub struct Cli {
    /// Path to a configuration file (defaults to .dealscope/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a startup description and print the report
    Analyze(analyze::AnalyzeArgs),

    /// Inspect or clear the persistent request cache
    Cache(cache::CacheArgs),
}

/// Print a failure and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    tracing::error!(error = %err, "command failed");
    eprintln!("error: {err:#}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["dealscope", "analyze", "Acme builds widgets"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => assert_eq!(args.text.as_deref(), Some("Acme builds widgets")),
            Commands::Cache(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_cache_stats() {
        let cli = Cli::try_parse_from(["dealscope", "cache", "stats"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(_)));
    }
}
