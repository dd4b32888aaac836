use crate::clock::presentation::{CallbackHandle, ClockEvent, PresentationClock};
use crate::foundation::core::{Box2i, FrameRate};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::video::RgbaFrame;
use crate::playback::frame_queue::{FrameQueue, QueuedFrame};
use crate::playback::sink::VideoSink;
use crate::playback::{PlaybackStats, VideoPlaybackOpts};
use crate::source::VideoSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Presentation time at which `frame` becomes due when playing in direction `dir` (±1).
///
/// Forward, a frame is due when its interval starts; backward, when the clock falls to the last
/// nanosecond of its interval.
pub(crate) fn due_presentation_time(rate: FrameRate, frame: i64, dir: i64) -> i64 {
    if dir < 0 {
        rate.time_of_frame(frame + 1) - 1
    } else {
        rate.time_of_frame(frame)
    }
}

/// True when the clock, now showing `current`, has already moved past `frame` in direction `dir`.
pub(crate) fn is_late(current: i64, frame: i64, dir: i64) -> bool {
    (current - frame) * dir > 0
}

/// Next frame to render: continue from `next` unless the clock has overtaken it.
pub(crate) fn next_render_frame(next: Option<i64>, current: i64, dir: i64) -> i64 {
    match next {
        Some(n) if !is_late(current, n, dir) => n,
        _ => current,
    }
}

#[derive(Default)]
struct Counters {
    presented: AtomicU64,
    dropped_late: AtomicU64,
    source_errors: AtomicU64,
}

struct Shared {
    source: Arc<dyn VideoSource>,
    clock: Arc<dyn PresentationClock>,
    queue: FrameQueue,
    rate: FrameRate,
    window: Box2i,
    poll: Duration,
    counters: Counters,
}

impl Shared {
    fn render(&self, index: i64) -> RgbaFrame {
        let mut frame = RgbaFrame::new(self.window);
        if let Err(err) = self.source.get_frame(index, &mut frame) {
            tracing::warn!(frame = index, error = %err, "source failed; showing transparent frame");
            self.counters.source_errors.fetch_add(1, Ordering::Relaxed);
            frame.clear();
        }
        frame
    }

    fn current_frame(&self) -> i64 {
        self.rate.frame_at_time(self.clock.presentation_time())
    }
}

/// Real-time video output driven by a [`PresentationClock`].
///
/// A render thread pulls frames ahead of the clock in the playback direction; a present thread
/// hands each one to the sink when the clock reaches it and drops frames the clock has passed.
/// While the clock is stopped the frame under the clock is rendered and presented once.
pub struct VideoPlayer {
    shared: Arc<Shared>,
    subscription: Option<CallbackHandle>,
    render: Option<JoinHandle<()>>,
    present: Option<JoinHandle<()>>,
}

impl VideoPlayer {
    /// Start playback threads.
    ///
    /// `window` is the region requested from `source` for every frame.
    pub fn spawn(
        source: Arc<dyn VideoSource>,
        clock: Arc<dyn PresentationClock>,
        sink: Box<dyn VideoSink>,
        rate: FrameRate,
        window: Box2i,
        opts: VideoPlaybackOpts,
    ) -> MontageResult<Self> {
        if window.is_empty() {
            return Err(MontageError::validation("video playback window is empty"));
        }
        let shared = Arc::new(Shared {
            source,
            clock: Arc::clone(&clock),
            queue: FrameQueue::new(opts.queue_capacity),
            rate,
            window,
            poll: Duration::from_millis(opts.poll_interval_ms.max(1)),
            counters: Counters::default(),
        });

        let subscription = {
            let weak = Arc::downgrade(&shared);
            clock.subscribe(Arc::new(move |event: &ClockEvent| {
                if let Some(shared) = weak.upgrade() {
                    let generation = shared.queue.bump_generation();
                    tracing::trace!(generation, kind = ?event.kind, "video player resync");
                }
            }))
        };

        let mut player = Self {
            shared: Arc::clone(&shared),
            subscription: Some(subscription),
            render: None,
            present: None,
        };
        // Dropping `player` on error unsubscribes and joins started threads.
        player.render = Some(spawn_worker("montage-video-render", {
            let shared = Arc::clone(&shared);
            move || render_loop(&shared)
        })?);
        player.present = Some(spawn_worker("montage-video-present", move || {
            present_loop(&shared, sink)
        })?);
        Ok(player)
    }

    /// Counters so far.
    pub fn stats(&self) -> PlaybackStats {
        let c = &self.shared.counters;
        PlaybackStats {
            presented: c.presented.load(Ordering::Relaxed),
            dropped_late: c.dropped_late.load(Ordering::Relaxed),
            source_errors: c.source_errors.load(Ordering::Relaxed),
        }
    }

    /// Stop both threads and detach from the clock.
    pub fn shutdown(&mut self) -> MontageResult<()> {
        if let Some(handle) = self.subscription.take() {
            self.shared.clock.unsubscribe(handle);
        }
        self.shared.queue.close();
        let mut panicked = false;
        for handle in [self.render.take(), self.present.take()].into_iter().flatten() {
            panicked |= handle.join().is_err();
        }
        if panicked {
            return Err(MontageError::playback("video playback thread panicked"));
        }
        Ok(())
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!(error = %err, "video player shutdown failed");
        }
    }
}

pub(crate) fn spawn_worker<F>(name: &str, f: F) -> MontageResult<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|e| MontageError::playback(format!("failed to spawn {name}: {e}")))
}

fn render_loop(shared: &Shared) {
    let queue = &shared.queue;
    let mut generation = queue.generation();
    let mut next: Option<i64> = None;
    let mut still_done = false;

    while !queue.is_closed() {
        let g = queue.generation();
        if g != generation {
            generation = g;
            next = None;
            still_done = false;
        }

        let dir = shared.clock.speed().signum();
        let current = shared.current_frame();
        if dir == 0 {
            if !still_done {
                let frame = shared.render(current);
                still_done = queue.push(QueuedFrame {
                    generation,
                    index: current,
                    frame,
                });
            }
            queue.wait_change(generation, shared.poll);
            continue;
        }

        let index = next_render_frame(next, current, dir);
        let frame = shared.render(index);
        if !queue.push(QueuedFrame {
            generation,
            index,
            frame,
        }) {
            break;
        }
        next = Some(index + dir);
    }
    tracing::debug!("video render thread exiting");
}

fn present_loop(shared: &Shared, mut sink: Box<dyn VideoSink>) {
    let queue = &shared.queue;
    while !queue.is_closed() {
        let Some(item) = queue.pop_timeout(shared.poll) else {
            continue;
        };
        if item.generation != queue.generation() {
            continue;
        }

        let snap = shared.clock.snapshot();
        let dir = snap.speed.signum();
        if dir != 0 {
            let due = due_presentation_time(shared.rate, item.index, dir);
            let Some(due_sys) = snap.system_time_for(due) else {
                continue;
            };
            let mut stale = false;
            while shared.clock.system_time() < due_sys {
                if queue.wait_change(item.generation, shared.poll) {
                    stale = true;
                    break;
                }
            }
            if stale {
                continue;
            }
            if is_late(shared.current_frame(), item.index, dir) {
                tracing::trace!(frame = item.index, "dropping late frame");
                shared
                    .counters
                    .dropped_late
                    .fetch_add(1, Ordering::Relaxed);
                continue;
            }
        }

        tracing::trace!(frame = item.index, queued = queue.len(), "presenting");
        match sink.present(item.index, &item.frame) {
            Ok(()) => {
                shared.counters.presented.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => tracing::warn!(frame = item.index, error = %err, "video sink failed"),
        }
    }
    tracing::debug!("video present thread exiting");
}

#[cfg(test)]
#[path = "../../tests/unit/playback/video.rs"]
mod tests;
