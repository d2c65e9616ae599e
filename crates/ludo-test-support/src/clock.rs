//! Test clock: deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeDelta, Utc};
use ludo_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns a clock fixed `delta` later than this one. Handy for
    /// exercising age-based room sweeps.
    #[must_use]
    pub fn advanced_by(self, delta: TimeDelta) -> Self {
        Self(self.0 + delta)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
