//! Per-player and per-pass harvest counters.

use std::time::Duration;

/// Counters accumulated while walking one player's lookback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerReport {
    /// Matches fetched and inserted this pass.
    pub newly_cached: usize,
    /// Candidate ids that were already present in the cache.
    pub already_cached: usize,
    /// Detail fetches that failed and were left for a future pass.
    pub failed: usize,
}

/// Totals for one complete harvest pass.
#[derive(Debug, Default, Clone)]
pub struct PassSummary {
    pub players_visited: usize,
    pub newly_cached: usize,
    pub already_cached: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl PassSummary {
    pub fn absorb(&mut self, report: PlayerReport) {
        self.newly_cached += report.newly_cached;
        self.already_cached += report.already_cached;
        self.failed += report.failed;
    }

    /// Elapsed time as `HH:MM:SS` for the end-of-pass report.
    pub fn formatted_elapsed(&self) -> String {
        let total = self.elapsed.as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_accumulates() {
        let mut summary = PassSummary::default();
        summary.absorb(PlayerReport {
            newly_cached: 3,
            already_cached: 2,
            failed: 1,
        });
        summary.absorb(PlayerReport {
            newly_cached: 1,
            already_cached: 0,
            failed: 0,
        });
        assert_eq!(summary.newly_cached, 4);
        assert_eq!(summary.already_cached, 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn elapsed_formats_as_hms() {
        let summary = PassSummary {
            elapsed: Duration::from_secs(3 * 3600 + 25 * 60 + 7),
            ..Default::default()
        };
        assert_eq!(summary.formatted_elapsed(), "03:25:07");
    }
}
