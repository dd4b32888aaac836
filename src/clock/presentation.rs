use crate::clock::time_base::{MonotonicTimeBase, TimeBase};
use crate::foundation::core::Rational;
use crate::foundation::math::{clamp_i64, div_ceil_i128, div_floor_i128};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Frozen clock parameters.
///
/// At system time `base_time` the presentation time was `seek_time`; from there it moves at
/// `speed` presentation nanoseconds per system nanosecond.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// System time of the last change.
    pub base_time: i64,
    /// Presentation time at `base_time`.
    pub seek_time: i64,
    /// Playback rate.
    pub speed: Rational,
}

impl ClockSnapshot {
    /// Presentation time at system time `system`: `seek + floor((system - base) * speed)`.
    pub fn time_at(&self, system: i64) -> i64 {
        let elapsed = i128::from(system) - i128::from(self.base_time);
        let moved = div_floor_i128(
            elapsed * i128::from(self.speed.num()),
            i128::from(self.speed.den()),
        );
        clamp_i64(i128::from(self.seek_time) + moved)
    }

    /// System time at which the clock reaches `presentation`, or `None` while stopped.
    ///
    /// The result may lie in the past when `presentation` is behind the clock.
    pub fn system_time_for(&self, presentation: i64) -> Option<i64> {
        if self.speed.is_zero() {
            return None;
        }
        let distance = i128::from(presentation) - i128::from(self.seek_time);
        let elapsed = div_ceil_i128(
            distance * i128::from(self.speed.den()),
            i128::from(self.speed.num()),
        );
        Some(clamp_i64(i128::from(self.base_time) + elapsed))
    }
}

/// What changed on the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEventKind {
    /// Presentation time jumped; speed unchanged.
    Seek,
    /// Speed changed; presentation time continuous.
    SpeedChange,
    /// Both speed and time were set at once.
    Set,
}

/// Notification delivered to clock subscribers after every change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockEvent {
    /// Kind of change.
    pub kind: ClockEventKind,
    /// Speed after the change.
    pub speed: Rational,
    /// Presentation time at the moment of the change.
    pub time: i64,
}

/// Observer invoked on clock changes.
pub type ClockCallback = Arc<dyn Fn(&ClockEvent) + Send + Sync>;

/// Token returned by [`PresentationClock::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

/// Read side of a presentation clock.
pub trait PresentationClock: Send + Sync {
    /// Current clock parameters.
    fn snapshot(&self) -> ClockSnapshot;

    /// Current system time of the underlying time base.
    fn system_time(&self) -> i64;

    /// Presentation time now.
    fn presentation_time(&self) -> i64 {
        self.snapshot().time_at(self.system_time())
    }

    /// Current speed.
    fn speed(&self) -> Rational {
        self.snapshot().speed
    }

    /// Register `callback`; it runs on the thread that changed the clock, after the clock's own
    /// lock is released, in subscription order. Changes racing on different threads may be
    /// delivered out of order; [`snapshot`](Self::snapshot) always reflects the latest one.
    fn subscribe(&self, callback: ClockCallback) -> CallbackHandle;

    /// Remove a subscription. Returns `false` for unknown handles.
    fn unsubscribe(&self, handle: CallbackHandle) -> bool;
}

/// Clock driven by explicit play/stop/seek calls over a [`TimeBase`].
pub struct SystemPresentationClock {
    time_base: Arc<dyn TimeBase>,
    state: Mutex<ClockSnapshot>,
    callbacks: Mutex<Vec<(CallbackHandle, ClockCallback)>>,
    next_handle: AtomicU64,
}

impl SystemPresentationClock {
    /// Stopped clock at presentation time 0.
    pub fn new(time_base: Arc<dyn TimeBase>) -> Self {
        let now = time_base.now_ns();
        Self {
            time_base,
            state: Mutex::new(ClockSnapshot {
                base_time: now,
                seek_time: 0,
                speed: Rational::ZERO,
            }),
            callbacks: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(0),
        }
    }

    /// Stopped clock over the wall clock.
    pub fn with_monotonic() -> Self {
        Self::new(Arc::new(MonotonicTimeBase::new()))
    }

    /// Change speed without moving presentation time.
    pub fn play(&self, speed: Rational) {
        let event = {
            let mut st = self.state.lock();
            let now = self.time_base.now_ns();
            let time = st.time_at(now);
            *st = ClockSnapshot {
                base_time: now,
                seek_time: time,
                speed,
            };
            ClockEvent {
                kind: ClockEventKind::SpeedChange,
                speed,
                time,
            }
        };
        self.notify(event);
    }

    /// Stop at the current presentation time.
    pub fn stop(&self) {
        self.play(Rational::ZERO);
    }

    /// Jump to `time`, keeping the speed.
    pub fn seek(&self, time: i64) {
        let event = {
            let mut st = self.state.lock();
            let now = self.time_base.now_ns();
            st.base_time = now;
            st.seek_time = time;
            ClockEvent {
                kind: ClockEventKind::Seek,
                speed: st.speed,
                time,
            }
        };
        self.notify(event);
    }

    /// Set speed and time together.
    pub fn set(&self, speed: Rational, time: i64) {
        {
            let mut st = self.state.lock();
            let now = self.time_base.now_ns();
            *st = ClockSnapshot {
                base_time: now,
                seek_time: time,
                speed,
            };
        }
        self.notify(ClockEvent {
            kind: ClockEventKind::Set,
            speed,
            time,
        });
    }

    fn notify(&self, event: ClockEvent) {
        tracing::debug!(kind = ?event.kind, speed = %event.speed, time = event.time, "clock changed");
        let callbacks: Vec<ClockCallback> = self
            .callbacks
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(&event);
        }
    }
}

impl PresentationClock for SystemPresentationClock {
    fn snapshot(&self) -> ClockSnapshot {
        *self.state.lock()
    }

    fn system_time(&self) -> i64 {
        self.time_base.now_ns()
    }

    fn subscribe(&self, callback: ClockCallback) -> CallbackHandle {
        let handle = CallbackHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.callbacks.lock().push((handle, callback));
        handle
    }

    fn unsubscribe(&self, handle: CallbackHandle) -> bool {
        let mut callbacks = self.callbacks.lock();
        let before = callbacks.len();
        callbacks.retain(|(h, _)| *h != handle);
        callbacks.len() != before
    }
}

impl fmt::Debug for SystemPresentationClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemPresentationClock")
            .field("state", &*self.state.lock())
            .field("subscribers", &self.callbacks.lock().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/presentation.rs"]
mod tests;
