//! Configuration management for matchvault.
//!
//! Settings come from an optional TOML file with deployment defaults;
//! secrets (provider API key, store connection string) are never read from
//! the file and arrive through the environment or CLI flags.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub storage: StorageSettings,
    pub rate_limit: RateLimitSettings,
    pub harvest: HarvestSettings,
}

impl Settings {
    /// Load settings from a TOML file, or fall back to defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading settings file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing settings file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Reject settings that cannot produce a working harvester.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.api_key.is_empty() {
            anyhow::bail!("provider API key is not set (PROVIDER_API_KEY)");
        }
        if self.storage.uri.is_empty() {
            anyhow::bail!("document store URI is not set (STORE_URI)");
        }
        if self.rate_limit.max_calls == 0 {
            anyhow::bail!("rate_limit.max_calls must be positive");
        }
        if self.harvest.page_days == 0 || self.harvest.lookback_days == 0 {
            anyhow::bail!("harvest lookback and page size must be positive");
        }
        Ok(())
    }
}

/// Provider API surface configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    /// Provider API key. Supplied via environment/CLI, never the file.
    #[serde(skip)]
    pub api_key: String,
    /// Base endpoint for match-id listing calls; the player id and `/ids`
    /// are appended per call.
    pub list_endpoint: String,
    /// Base endpoint for match detail calls; the match id is appended.
    pub detail_endpoint: String,
    /// Queue/category filter applied to every listing call.
    pub queue: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How many 429 responses to retry before abandoning a call.
    pub max_throttle_retries: u32,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            list_endpoint: "https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid"
                .to_string(),
            detail_endpoint: "https://americas.api.riotgames.com/lol/match/v5/matches".to_string(),
            queue: 420,
            timeout_secs: 30,
            max_throttle_retries: 5,
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// Connection string. Supplied via environment/CLI, never the file.
    #[serde(skip)]
    pub uri: String,
    pub database: String,
    /// Collection holding one roster document per tracked group.
    pub roster_collection: String,
    /// Collection holding cached match records keyed by `metadata.matchId`.
    pub match_collection: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: "matchvault".to_string(),
            roster_collection: "rosters".to_string(),
            match_collection: "match_cache".to_string(),
        }
    }
}

/// Outbound call budget: at most `max_calls` within any trailing window of
/// `period_secs` seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitSettings {
    pub max_calls: usize,
    pub period_secs: u64,
}

impl RateLimitSettings {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_calls: 100,
            period_secs: 120,
        }
    }
}

/// Lookback walk configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestSettings {
    /// Total days of history to cover per player, per pass.
    pub lookback_days: u32,
    /// Maximum span of one listing window, in days.
    pub page_days: u32,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            page_days: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.rate_limit.max_calls, 100);
        assert_eq!(settings.rate_limit.period(), Duration::from_secs(120));
        assert_eq!(settings.harvest.lookback_days, 30);
        assert_eq!(settings.harvest.page_days, 5);
        assert_eq!(settings.provider.queue, 420);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [rate_limit]
            max_calls = 20

            [harvest]
            page_days = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.rate_limit.max_calls, 20);
        assert_eq!(settings.rate_limit.period_secs, 120);
        assert_eq!(settings.harvest.page_days, 3);
        assert_eq!(settings.harvest.lookback_days, 30);
    }

    #[test]
    fn secrets_are_not_read_from_file() {
        let settings: Settings = toml::from_str(
            r#"
            [storage]
            database = "other"
            "#,
        )
        .unwrap();
        assert!(settings.storage.uri.is_empty());
        assert!(settings.provider.api_key.is_empty());
        assert_eq!(settings.storage.database, "other");
    }

    #[test]
    fn validate_requires_secrets() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.provider.api_key = "key".to_string();
        assert!(settings.validate().is_err());

        settings.storage.uri = "mongodb://localhost".to_string();
        assert!(settings.validate().is_ok());
    }
}
