// ── Reconnection policy ──
//
// Linear backoff for the status stream. Each loss bumps the attempt count
// first and then waits `base_delay * attempt`, so the default schedule is
// 2s, 4s, 6s, 8s, 10s. Once the budget is spent the client gives up for
// the rest of its lifetime.

use std::time::Duration;

/// Default delay unit between reconnection attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(2000);

/// Default number of reconnection attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// What to do after the stream was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Open the stream again after `delay`. `attempt` is 1-based.
    Retry { attempt: u32, delay: Duration },
    /// Budget exhausted; never reconnect again.
    GiveUp,
}

/// Linear reconnection backoff with a fixed attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt number `attempt` (1-based).
    pub fn next_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Decide how to react to a loss, given the attempt count *before* the
    /// loss is counted.
    pub fn decide(&self, attempt_count: u32) -> ReconnectDecision {
        if attempt_count < self.max_attempts {
            let attempt = attempt_count + 1;
            ReconnectDecision::Retry {
                attempt,
                delay: self.next_delay(attempt),
            }
        } else {
            ReconnectDecision::GiveUp
        }
    }
}
