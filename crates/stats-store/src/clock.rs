//! Time source for bucket timestamps

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Width of one bucket timestamp tick
pub const TICK: Duration = Duration::from_millis(100);

/// Source of elapsed time since a fixed epoch
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch
    fn elapsed(&self) -> Duration;
}

/// Convert an elapsed duration into a bucket timestamp (whole ticks)
pub fn bucket_timestamp(elapsed: Duration) -> i64 {
    let ticks = elapsed.as_nanos() / TICK.as_nanos();
    i64::try_from(ticks).unwrap_or(i64::MAX)
}

/// Monotonic clock whose epoch is the instant it was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Manually advanced clock, for deterministic timestamps in tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock at elapsed zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Move the clock forward by whole ticks
    pub fn advance_ticks(&self, ticks: u32) {
        self.advance(TICK * ticks);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock()
    }
}
