use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_VISIBILITY_BUDGET: Duration = Duration::from_secs(20 * 60);

/// How long to wait, and how often to look, for a freshly created
/// gateway to show up in the controller's read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// Delay before each read, including the first.
    pub interval: Duration,
    /// Total wall-clock budget measured from the end of the create call.
    pub budget: Duration,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            budget: DEFAULT_VISIBILITY_BUDGET,
        }
    }
}

impl VisibilityPolicy {
    pub fn new(interval: Duration, budget: Duration) -> Self {
        Self { interval, budget }
    }

    /// Upper bound on reads one wait can issue.
    pub fn max_attempts(&self) -> u64 {
        if self.interval.is_zero() {
            return u64::MAX;
        }
        let budget = self.budget.as_millis();
        let interval = self.interval.as_millis();
        u64::try_from(budget / interval).unwrap_or(u64::MAX)
    }
}
