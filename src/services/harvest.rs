//! One harvest pass: resolve the roster, walk each player's lookback in
//! bounded windows, and cache only the matches the store has not seen.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::HarvestSettings;
use crate::models::{lookback_windows, PassSummary, Player, PlayerReport};
use crate::provider::{MatchApi, RateLimiter};
use crate::repository::{CacheStore, RosterSource, StoreError};

/// Orchestrates one pass over every group and tracked player.
///
/// All network calls go out sequentially, gated by the rate limiter, which
/// keeps the rolling-window call accounting exact.
pub struct HarvestJob {
    roster: Arc<dyn RosterSource>,
    cache: Arc<dyn CacheStore>,
    api: Arc<dyn MatchApi>,
    limiter: RateLimiter,
    settings: HarvestSettings,
}

impl HarvestJob {
    pub fn new(
        roster: Arc<dyn RosterSource>,
        cache: Arc<dyn CacheStore>,
        api: Arc<dyn MatchApi>,
        limiter: RateLimiter,
        settings: HarvestSettings,
    ) -> Self {
        Self {
            roster,
            cache,
            api,
            limiter,
            settings,
        }
    }

    /// Run one complete harvest pass.
    ///
    /// Provider failures are isolated to the affected window or match;
    /// roster and storage failures abort the pass.
    pub async fn run_pass(&self) -> Result<PassSummary, StoreError> {
        let started = Instant::now();
        info!(
            lookback_days = self.settings.lookback_days,
            started_at = %Utc::now().format("%m/%d/%y %H:%M:%S"),
            "caching match data"
        );

        // Players can be referenced by several groups; visit each at most
        // once per pass.
        let mut visited: HashSet<String> = HashSet::new();
        let mut summary = PassSummary::default();

        for group in self.roster.list_groups().await? {
            let Some(players) = self.roster.list_players(&group.id).await? else {
                debug!(group = %group.id, "group has no roster, skipping");
                continue;
            };
            for player in players {
                if !visited.insert(player.puuid.clone()) {
                    debug!(player = %player.name, "already visited this pass");
                    continue;
                }
                let report = self.harvest_player(&player).await?;
                info!(
                    player = %player.name,
                    newly_cached = report.newly_cached,
                    already_cached = report.already_cached,
                    "player harvest complete"
                );
                summary.absorb(report);
            }
        }

        summary.players_visited = visited.len();
        summary.elapsed = started.elapsed();
        info!(
            players = summary.players_visited,
            newly_cached = summary.newly_cached,
            elapsed = %summary.formatted_elapsed(),
            "pass complete"
        );
        Ok(summary)
    }

    /// Walk one player's lookback, newest window first.
    async fn harvest_player(&self, player: &Player) -> Result<PlayerReport, StoreError> {
        let mut report = PlayerReport::default();
        let now = Utc::now();

        for window in lookback_windows(now, self.settings.lookback_days, self.settings.page_days) {
            debug!(
                player = %player.name,
                start = %window.start.format("%Y-%m-%d"),
                end = %window.end.format("%Y-%m-%d"),
                "listing matches"
            );

            self.limiter.acquire().await;
            let candidates = match self.api.list_match_ids(&player.puuid, &window).await {
                Ok(Some(ids)) => ids,
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!(player = %player.name, error = %e, "listing failed, window treated as empty");
                    Vec::new()
                }
            };
            if candidates.is_empty() {
                continue;
            }

            let existing = self.cache.find_existing(&candidates).await?;
            report.already_cached += existing.len();

            for id in candidates.into_iter().filter(|id| !existing.contains(id)) {
                self.limiter.acquire().await;
                match self.api.fetch_match(&id).await {
                    Ok(Some(record)) => {
                        self.cache.insert(&record).await?;
                        report.newly_cached += 1;
                    }
                    // Already reported by the provider layer; the match
                    // stays uncached until a later pass re-discovers it.
                    Ok(None) => report.failed += 1,
                    Err(e) => {
                        warn!(match_id = %id, error = %e, "detail fetch failed, leaving uncached");
                        report.failed += 1;
                    }
                }
            }
        }

        Ok(report)
    }
}
