//! Invocation time budget
//!
//! The serverless runtime enforces a hard wall-clock ceiling per invocation
//! and can kill the process at that boundary without warning. The budget
//! check is therefore conservative: it runs before a page fetch starts, and
//! a margin is reserved for the final checkpoint and browser shutdown.

use crate::config::LimitConfig;
use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock budget for one invocation
#[derive(Debug, Clone)]
pub struct TimeBudget {
    started: Instant,
    total: Duration,
    margin: Duration,
}

impl TimeBudget {
    /// Starts a budget clock now
    pub fn new(total: Duration, margin: Duration) -> Self {
        Self {
            started: Instant::now(),
            total,
            margin,
        }
    }

    pub fn from_limits(limits: &LimitConfig) -> Self {
        Self::new(
            Duration::from_secs(limits.time_budget_secs),
            Duration::from_secs(limits.budget_margin_secs),
        )
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the hard ceiling
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.started.elapsed())
    }

    /// Whether another page fetch may start
    ///
    /// True only while the remaining time exceeds the shutdown margin.
    /// Stopping one page early beats being killed mid-fetch with unflushed
    /// state.
    pub fn can_start_page(&self) -> bool {
        self.remaining() > self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generous_budget_allows_pages() {
        let budget = TimeBudget::new(Duration::from_secs(600), Duration::from_secs(60));
        assert!(budget.can_start_page());
        assert!(budget.remaining() > Duration::from_secs(500));
    }

    #[test]
    fn test_zero_budget_blocks_immediately() {
        let budget = TimeBudget::new(Duration::ZERO, Duration::ZERO);
        assert!(!budget.can_start_page());
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_margin_is_reserved() {
        // Remaining time is below the margin from the start
        let budget = TimeBudget::new(Duration::from_millis(50), Duration::from_secs(10));
        assert!(!budget.can_start_page());
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_expires_over_time() {
        let budget = TimeBudget::new(Duration::from_secs(10), Duration::from_secs(2));
        assert!(budget.can_start_page());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(!budget.can_start_page());
    }
}
