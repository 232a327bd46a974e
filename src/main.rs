//! Dealscope CLI entry point.

use clap::Parser;

use dealscope::cli::{handle_error, Cli, Commands};
use dealscope::infrastructure::config::ConfigLoader;
use dealscope::infrastructure::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err),
    };

    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(err) => handle_error(err),
    };

    let result = match cli.command {
        Commands::Analyze(args) => dealscope::cli::analyze::execute(args, &config).await,
        Commands::Cache(args) => dealscope::cli::cache::execute(args, &config),
    };

    if let Err(err) = result {
        handle_error(err);
    }
}
