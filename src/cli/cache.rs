//! `dealscope cache` — persistent request cache maintenance.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::domain::models::config::Config;
use crate::infrastructure::cache::RequestCache;

/// Arguments for the cache command
#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache subcommands
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show entry counts per tier
    Stats,

    /// Remove every cached entry
    Clear,
}

/// Execute the cache command.
pub fn execute(args: CacheArgs, config: &Config) -> Result<()> {
    let cache = RequestCache::new(&config.cache);

    match args.command {
        CacheCommand::Stats => {
            let stats = cache.stats();
            println!("cache dir:      {}", config.cache.dir);
            println!("memory entries: {}", stats.memory_entries);
            println!("disk entries:   {}", stats.disk_entries);
        }
        CacheCommand::Clear => {
            cache.clear();
            println!("cache cleared");
        }
    }

    Ok(())
}
