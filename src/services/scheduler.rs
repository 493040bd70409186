//! Top-of-hour scheduling loop.

use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tokio::time::sleep;
use tracing::info;

use super::harvest::HarvestJob;
use crate::repository::StoreError;

/// Idle time after a pass before recomputing the next boundary, so a fast
/// pass cannot double-fire within the same hour.
const GRACE_AFTER_PASS: Duration = Duration::from_secs(10);

/// The next top-of-hour boundary strictly after `now`.
fn next_top_of_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let next = now + TimeDelta::hours(1);
    next.duration_trunc(TimeDelta::hours(1)).unwrap_or(next)
}

/// Drive the harvest job once per hour, aligned to the top of the hour,
/// until a pass fails.
///
/// Provider trouble is already absorbed inside the pass; an error reaching
/// this loop means the roster or the store is unavailable, which is not
/// continuable. It propagates out so the process-level supervisor restarts
/// with a fresh connection.
pub async fn run_hourly(job: HarvestJob) -> Result<(), StoreError> {
    loop {
        let now = Utc::now();
        let next = next_top_of_hour(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(
            next_run = %next.format("%H:%M:%S"),
            wait_secs = wait.as_secs(),
            "waiting until the next hour"
        );
        sleep(wait).await;

        job.run_pass().await?;

        sleep(GRACE_AFTER_PASS).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Timelike};

    use crate::config::HarvestSettings;
    use crate::models::{Group, HarvestWindow, MatchId, MatchRecord, Player};
    use crate::provider::{MatchApi, ProviderError, RateLimiter};
    use crate::repository::{MemoryCacheStore, RosterSource};

    struct DeadRoster;

    #[async_trait]
    impl RosterSource for DeadRoster {
        async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
            Err(StoreError::Malformed("roster unavailable".to_string()))
        }

        async fn list_players(&self, _group_id: &str) -> Result<Option<Vec<Player>>, StoreError> {
            Ok(None)
        }
    }

    struct SilentApi;

    #[async_trait]
    impl MatchApi for SilentApi {
        async fn list_match_ids(
            &self,
            _puuid: &str,
            _window: &HarvestWindow,
        ) -> Result<Option<Vec<MatchId>>, ProviderError> {
            Ok(None)
        }

        async fn fetch_match(&self, _id: &MatchId) -> Result<Option<MatchRecord>, ProviderError> {
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn storage_failure_ends_the_loop() {
        let job = crate::services::HarvestJob::new(
            Arc::new(DeadRoster),
            Arc::new(MemoryCacheStore::new()),
            Arc::new(SilentApi),
            RateLimiter::new(100, Duration::from_secs(120)),
            HarvestSettings::default(),
        );

        // The hourly wait elapses under paused time; the first pass hits
        // the dead roster and the error must escape the loop.
        let result = run_hourly(job).await;
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }

    #[test]
    fn boundary_is_the_next_whole_hour() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 12, 34, 56).unwrap();
        let next = next_top_of_hour(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 4, 13, 0, 0).unwrap());
    }

    #[test]
    fn boundary_from_a_whole_hour_is_the_following_hour() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 13, 0, 0).unwrap();
        let next = next_top_of_hour(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 4, 14, 0, 0).unwrap());
    }

    #[test]
    fn boundary_is_always_aligned_and_in_the_future() {
        let now = Utc::now();
        let next = next_top_of_hour(now);
        assert!(next > now);
        assert!(next - now <= TimeDelta::hours(1));
        assert_eq!(next.minute(), 0);
        assert_eq!(next.second(), 0);
        assert_eq!(next.nanosecond(), 0);
    }
}
