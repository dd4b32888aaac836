use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Source of monotonically non-decreasing system time in nanoseconds.
pub trait TimeBase: Send + Sync {
    /// Current system time.
    fn now_ns(&self) -> i64;
}

/// Wall-clock time base measured from its creation.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicTimeBase {
    origin: Instant,
}

impl MonotonicTimeBase {
    /// Time base reading zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeBase for MonotonicTimeBase {
    fn now_ns(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// Time base that only moves when told to; used to drive clocks deterministically.
#[derive(Debug, Default)]
pub struct ManualTimeBase {
    now: AtomicI64,
}

impl ManualTimeBase {
    /// Time base reading `start`.
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `delta` nanoseconds.
    pub fn advance(&self, delta: i64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl TimeBase for ManualTimeBase {
    fn now_ns(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/time_base.rs"]
mod tests;
