//! Time sources and the fixed-interval tick gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source. `now` is measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
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

/// Clock that only moves when told to. Clones share the same time, so a test
/// can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Decides when a simulation tick is due.
///
/// At most one tick fires per poll; if several intervals have passed the
/// extra ones are dropped rather than caught up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickScheduler {
    epoch: Duration,
    last_tick: Duration,
}

impl TickScheduler {
    pub fn new(now: Duration) -> Self {
        Self {
            epoch: now,
            last_tick: Duration::ZERO,
        }
    }

    /// Start measuring from `now` with no tick taken yet
    pub fn restart(&mut self, now: Duration) {
        self.epoch = now;
        self.last_tick = Duration::ZERO;
    }

    /// Time since the last restart
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.epoch)
    }

    /// Returns true, and records the tick, when `interval` has passed since
    /// the previous tick.
    pub fn poll(&mut self, now: Duration, interval: Duration) -> bool {
        let elapsed = self.elapsed(now);
        if elapsed.saturating_sub(self.last_tick) >= interval {
            self.last_tick = elapsed;
            true
        } else {
            false
        }
    }
}
