//! Time sources.
//!
//! The engine never reads wall-clock time directly. It asks a [`Clock`],
//! so tests drive the gated commit with a [`ManualClock`] and get the same
//! result every run.

use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{instrument, trace};

/// A monotonic time source measured from the clock's own epoch.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
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
        self.epoch.elapsed()
    }
}

/// Manually advanced time.
///
/// Clones share the same reading, so a test can hand one clone to the engine
/// and keep another to move time forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<std::cell::Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `delta`.
    #[instrument(skip(self))]
    pub fn advance(&self, delta: Duration) {
        let now = self.now.get() + delta;
        self.now.set(now);
        trace!(?now, "Manual clock advanced");
    }

    /// Moves time forward by `millis` milliseconds.
    pub fn advance_ms(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Sets the reading. Time may not run backwards.
    pub fn set(&self, now: Duration) {
        self.now.set(now.max(self.now.get()));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
