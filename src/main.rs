//! matchvault - match-history harvester for tracked player rosters.
//!
//! Runs unattended, once per hour, caching newly-seen match records for
//! every tracked player from a rate-limited game-statistics API.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchvault::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "matchvault=debug"
    } else {
        "matchvault=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
