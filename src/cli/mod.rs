//! CLI parser and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::provider::{ProviderClient, RateLimiter};
use crate::repository;
use crate::services::{scheduler, HarvestJob};

#[derive(Parser)]
#[command(name = "mvault")]
#[command(about = "Match-history harvester and cache for tracked player rosters")]
#[command(version)]
pub struct Cli {
    /// Settings file path (built-in defaults when absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Provider API key
    #[arg(long, env = "PROVIDER_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Document store connection string
    #[arg(long, env = "STORE_URI", global = true, hide_env_values = true)]
    store_uri: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hourly harvest scheduler until terminated
    Run,
    /// Run a single harvest pass immediately and exit
    Once,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(key) = cli.api_key {
        settings.provider.api_key = key;
    }
    if let Some(uri) = cli.store_uri {
        settings.storage.uri = uri;
    }
    settings.validate()?;

    let (roster, cache) = repository::connect(&settings.storage).await?;
    let client = ProviderClient::new(&settings.provider)?;
    let limiter = RateLimiter::new(settings.rate_limit.max_calls, settings.rate_limit.period());
    let job = HarvestJob::new(
        Arc::new(roster),
        Arc::new(cache),
        Arc::new(client),
        limiter,
        settings.harvest.clone(),
    );

    match cli.command {
        Commands::Run => {
            // A pass failure here is roster/storage unavailability; let the
            // process supervisor restart with a fresh connection.
            scheduler::run_hourly(job).await?;
            Ok(())
        }
        Commands::Once => {
            let summary = job.run_pass().await?;
            println!(
                "{} players visited, {} matches newly cached ({} already cached, {} failed) in {}",
                summary.players_visited,
                summary.newly_cached,
                summary.already_cached,
                summary.failed,
                summary.formatted_elapsed()
            );
            Ok(())
        }
    }
}
