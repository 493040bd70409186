//! Rolling-window outbound call budget.
//!
//! All network access funnels through [`RateLimiter::acquire`], which
//! suspends the caller until one more call fits within the trailing period.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

/// Sliding-window rate limiter: at most `max_calls` acquisitions within any
/// trailing window of `period`.
///
/// Timestamps are owned by the limiter and guarded by a mutex, so the
/// limiter can be shared between tasks. Uses `tokio::time::Instant` so the
/// budget can be exercised under paused test time.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        assert!(max_calls > 0, "call budget must be positive");
        Self {
            max_calls,
            period,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Suspend until one more call fits the budget, then record it.
    ///
    /// Wakes re-check the budget instead of recording greedily, so
    /// concurrent waiters cannot overdraw the window.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();

                // Discard calls that have left the trailing window.
                while calls
                    .front()
                    .is_some_and(|&t| now.duration_since(t) >= self.period)
                {
                    calls.pop_front();
                }

                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    return;
                }

                // The oldest recorded call leaves the window at `t + period`.
                let oldest = *calls.front().expect("budget is full, deque non-empty");
                oldest + self.period - now
            };

            debug!(
                wait_secs = wait.as_secs_f64(),
                "call budget exhausted, waiting"
            );
            sleep(wait).await;
        }
    }
}
