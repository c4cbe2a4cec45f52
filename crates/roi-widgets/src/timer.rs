//! Fixed-interval fallback timer
//!
//! The host drives the timer by calling [`FallbackTimer::fire_if_due`] from
//! its own loop; nothing here sleeps or spawns.

use std::time::{Duration, Instant};

/// Default re-read period of the calculator's polling fallback
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct FallbackTimer {
    interval: Duration,
    last_fired: Instant,
}

impl FallbackTimer {
    /// Start a timer whose first tick is due one interval after `now`
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fired: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_fired) >= self.interval
    }

    /// Consume a due tick. Missed ticks are not replayed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_fired = now;
        true
    }

    /// Time left until the next tick
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_fired))
    }
}
