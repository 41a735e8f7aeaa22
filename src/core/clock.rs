//! # Clocks
//!
//! The core never reads wall-clock time. Hosts sample a [`Clock`] and feed
//! the reading in as `Action::Tick(now)`. Readings are offsets from the
//! moment the clock was created, so the same numbers mean the same thing in
//! production and in tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A source of monotonic time offsets.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;
}

/// Real monotonic time, used by the terminal host.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Makes timer-driven behavior
/// (typewriter pacing, delayed re-enable) deterministic in tests.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Jumps to `to`. Never moves backwards.
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
