//! Lookback pagination windows.

use chrono::{DateTime, Duration, Utc};

/// A contiguous `[start, end)` span used to page one listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl HarvestWindow {
    pub fn start_unix(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_unix(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Partition the trailing `lookback_days` before `now` into windows of at
/// most `page_days` each, newest first.
///
/// The walk advances strictly backward from `now`; the final window is
/// shortened when the lookback is not a multiple of the page size, so the
/// windows cover exactly `lookback_days` with no gaps or overlaps.
pub fn lookback_windows(
    now: DateTime<Utc>,
    lookback_days: u32,
    page_days: u32,
) -> Vec<HarvestWindow> {
    let mut windows = Vec::new();
    let mut days_fetched = 0u32;
    while days_fetched < lookback_days {
        let span = page_days.min(lookback_days - days_fetched);
        let end = now - Duration::days(i64::from(days_fetched));
        let start = end - Duration::days(i64::from(span));
        windows.push(HarvestWindow { start, end });
        days_fetched += span;
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_days_in_five_day_pages_is_six_windows() {
        let now = Utc::now();
        let windows = lookback_windows(now, 30, 5);
        assert_eq!(windows.len(), 6);
        assert!(windows.iter().all(|w| w.days() == 5));
    }

    #[test]
    fn windows_are_contiguous_and_newest_first() {
        let now = Utc::now();
        let windows = lookback_windows(now, 30, 5);
        assert_eq!(windows[0].end, now);
        for pair in windows.windows(2) {
            assert_eq!(pair[1].end, pair[0].start);
        }
        assert_eq!(windows.last().unwrap().start, now - Duration::days(30));
    }

    #[test]
    fn tail_window_is_shortened() {
        let now = Utc::now();
        let windows = lookback_windows(now, 12, 5);
        let spans: Vec<i64> = windows.iter().map(HarvestWindow::days).collect();
        assert_eq!(spans, vec![5, 5, 2]);
        assert_eq!(windows.last().unwrap().start, now - Duration::days(12));
    }

    #[test]
    fn page_larger_than_lookback_yields_one_window() {
        let now = Utc::now();
        let windows = lookback_windows(now, 3, 5);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].days(), 3);
    }

    #[test]
    fn zero_lookback_yields_no_windows() {
        assert!(lookback_windows(Utc::now(), 0, 5).is_empty());
    }
}
