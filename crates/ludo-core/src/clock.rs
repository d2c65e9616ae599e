//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Source of the current time. Rooms record their creation time through it
/// and the room sweep compares against it.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
