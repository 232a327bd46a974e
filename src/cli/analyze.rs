//! `dealscope analyze` — run the full report pipeline on one description.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::analysts::StartupAnalyzer;
use crate::domain::models::config::Config;
use crate::domain::ports::CompletionClient;
use crate::infrastructure::cache::RequestCache;
use crate::infrastructure::openai::{OpenAiClient, OpenAiClientConfig};
use crate::services::{CompletionService, Orchestrator};

/// Arguments for the analyze command
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Startup description text
    pub text: Option<String>,

    /// Read the startup description from a file instead
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Use natural-language mode instead of structured scoring
    #[arg(long)]
    pub natural: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let startup_text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide a startup description or --file"),
    };

    let cache = Arc::new(RequestCache::new(&config.cache));
    let client = build_client(config)?;
    let service = Arc::new(CompletionService::new(client, cache, config));
    let orchestrator = Orchestrator::new(config.orchestrator.max_workers);
    let analyzer = StartupAnalyzer::new(service, orchestrator, config);

    let report = if args.natural {
        analyzer.analyze_natural(&startup_text).await?
    } else {
        analyzer.analyze(&startup_text).await?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Build the HTTP client when a credential is configured; `None` degrades
/// every call to the labeled offline result.
fn build_client(config: &Config) -> Result<Option<Arc<dyn CompletionClient>>> {
    let Some(api_key) = config.completion.resolved_api_key() else {
        return Ok(None);
    };
    let client = OpenAiClient::new(OpenAiClientConfig {
        api_key,
        base_url: config.completion.base_url.clone(),
        timeout_secs: config.completion.timeout_secs,
    })
    .context("failed to build completion client")?;
    Ok(Some(Arc::new(client)))
}
