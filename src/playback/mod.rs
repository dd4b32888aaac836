//! Clock-driven real-time outputs.
//!
//! Players pull from a source on worker threads and hand the result to a sink at the boundary
//! with the outside world (display widget, audio device). Every clock change bumps a generation
//! counter; work tagged with an older generation is discarded.

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

pub(crate) mod audio;
pub(crate) mod frame_queue;
pub(crate) mod sink;
pub(crate) mod video;

/// Tuning for [`video::VideoPlayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoPlaybackOpts {
    /// Rendered frames buffered ahead of presentation.
    pub queue_capacity: usize,
    /// Upper bound on how long a worker sleeps before re-reading the clock.
    pub poll_interval_ms: u64,
}

impl Default for VideoPlaybackOpts {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            poll_interval_ms: 4,
        }
    }
}

/// Tuning for [`audio::AudioPlayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioPlaybackOpts {
    /// Samples per write.
    pub chunk_samples: usize,
    /// How far ahead of the clock writes may run.
    pub lead_ms: u64,
    /// Upper bound on how long the worker sleeps before re-reading the clock.
    pub poll_interval_ms: u64,
}

impl Default for AudioPlaybackOpts {
    fn default() -> Self {
        Self {
            chunk_samples: 1024,
            lead_ms: 100,
            poll_interval_ms: 4,
        }
    }
}

/// Counters reported by the video player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Frames handed to the sink.
    pub presented: u64,
    /// Frames discarded because the clock had already passed them.
    pub dropped_late: u64,
    /// Frames whose source failed and were shown transparent.
    pub source_errors: u64,
}

#[derive(Debug)]
struct SignalState {
    generation: u64,
    closed: bool,
}

/// Generation counter with a wake-up channel shared by a player's threads and its clock callback.
#[derive(Debug)]
pub(crate) struct Signal {
    state: Mutex<SignalState>,
    cv: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SignalState {
                generation: 0,
                closed: false,
            }),
            cv: Condvar::new(),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub(crate) fn bump(&self) -> u64 {
        let mut st = self.state.lock();
        st.generation += 1;
        self.cv.notify_all();
        st.generation
    }

    pub(crate) fn close(&self) {
        self.state.lock().closed = true;
        self.cv.notify_all();
    }

    /// Sleep up to `timeout`; returns `true` when the generation moved past `seen` or the signal
    /// closed.
    pub(crate) fn wait_change(&self, seen: u64, timeout: Duration) -> bool {
        let mut st = self.state.lock();
        if st.generation != seen || st.closed {
            return true;
        }
        self.cv.wait_for(&mut st, timeout);
        st.generation != seen || st.closed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/mod.rs"]
mod tests;
