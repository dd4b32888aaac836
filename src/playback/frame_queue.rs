use crate::frame::video::RgbaFrame;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;

/// A rendered frame waiting for its presentation time.
#[derive(Debug)]
pub(crate) struct QueuedFrame {
    pub(crate) generation: u64,
    pub(crate) index: i64,
    pub(crate) frame: RgbaFrame,
}

struct QueueInner {
    frames: VecDeque<QueuedFrame>,
    capacity: usize,
    generation: u64,
    closed: bool,
}

/// Bounded hand-off between the render and present threads.
///
/// Bumping the generation empties the queue and wakes every waiter; frames pushed with an older
/// generation are discarded on arrival.
pub(crate) struct FrameQueue {
    inner: Mutex<QueueInner>,
    not_full: Condvar,
    not_empty: Condvar,
    changed: Condvar,
}

impl FrameQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(QueueInner {
                frames: VecDeque::with_capacity(capacity),
                capacity,
                generation: 0,
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            changed: Condvar::new(),
        }
    }

    /// Block while full. Returns `false` once the queue is closed.
    pub(crate) fn push(&self, item: QueuedFrame) -> bool {
        let mut inner = self.inner.lock();
        while inner.frames.len() >= inner.capacity
            && !inner.closed
            && inner.generation == item.generation
        {
            self.not_full.wait(&mut inner);
        }
        if inner.closed {
            return false;
        }
        if inner.generation == item.generation {
            inner.frames.push_back(item);
            self.not_empty.notify_one();
        }
        true
    }

    /// Pop the oldest frame, waiting up to `timeout` for one to arrive.
    pub(crate) fn pop_timeout(&self, timeout: Duration) -> Option<QueuedFrame> {
        let mut inner = self.inner.lock();
        if inner.frames.is_empty() && !inner.closed {
            self.not_empty.wait_for(&mut inner, timeout);
        }
        let item = inner.frames.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    pub(crate) fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Start a new generation: drop queued frames and wake all waiters.
    pub(crate) fn bump_generation(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.frames.clear();
        self.not_full.notify_all();
        self.not_empty.notify_all();
        self.changed.notify_all();
        inner.generation
    }

    /// Sleep up to `timeout`; returns `true` when the generation moved past `seen` or the queue
    /// closed.
    pub(crate) fn wait_change(&self, seen: u64, timeout: Duration) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != seen || inner.closed {
            return true;
        }
        self.changed.wait_for(&mut inner, timeout);
        inner.generation != seen || inner.closed
    }

    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
        self.changed.notify_all();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().frames.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/frame_queue.rs"]
mod tests;
