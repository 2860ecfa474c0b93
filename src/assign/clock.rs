//! Monotonic time source for the solver's retry budget

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic clock reporting time elapsed since some fixed origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time from [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated clock that moves forward by a fixed step on every reading
#[derive(Debug, Default)]
pub struct SteppingClock {
    now: Cell<Duration>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
