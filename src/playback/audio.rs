use crate::clock::presentation::{CallbackHandle, ClockEvent, PresentationClock};
use crate::foundation::core::{FrameRate, Rational};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::audio::AudioFrame;
use crate::playback::sink::AudioSink;
use crate::playback::video::spawn_worker;
use crate::playback::{AudioPlaybackOpts, Signal};
use crate::source::AudioSource;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Samples the writer may run ahead of the clock.
pub(crate) fn lead_samples(rate: FrameRate, lead_ms: u64) -> i64 {
    let lead_ns = i64::try_from(lead_ms.saturating_mul(1_000_000)).unwrap_or(i64::MAX);
    rate.frame_at_time(lead_ns)
}

/// Where the next write starts: keep `cursor` unless it fell behind the clock at `now`.
pub(crate) fn resync_cursor(cursor: Option<i64>, now: i64) -> i64 {
    match cursor {
        Some(c) if c >= now => c,
        _ => now,
    }
}

struct Shared {
    source: Arc<dyn AudioSource>,
    clock: Arc<dyn PresentationClock>,
    signal: Signal,
    rate: FrameRate,
    opts: AudioPlaybackOpts,
}

/// Real-time audio output driven by a [`PresentationClock`].
///
/// Samples are only produced while the clock runs at exactly normal speed. After every clock
/// change the sink is flushed and writing restarts at the sample under the clock.
pub struct AudioPlayer {
    shared: Arc<Shared>,
    subscription: Option<CallbackHandle>,
    worker: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Start the writer thread. `rate` is the sample rate of `source`'s sample axis.
    pub fn spawn(
        source: Arc<dyn AudioSource>,
        clock: Arc<dyn PresentationClock>,
        sink: Box<dyn AudioSink>,
        rate: FrameRate,
        opts: AudioPlaybackOpts,
    ) -> MontageResult<Self> {
        if sink.channels() != source.channels() {
            return Err(MontageError::validation(format!(
                "audio sink has {} channels, source has {}",
                sink.channels(),
                source.channels()
            )));
        }
        if opts.chunk_samples == 0 {
            return Err(MontageError::validation("chunk_samples must be > 0"));
        }

        let shared = Arc::new(Shared {
            source,
            clock: Arc::clone(&clock),
            signal: Signal::new(),
            rate,
            opts,
        });
        let subscription = {
            let weak = Arc::downgrade(&shared);
            clock.subscribe(Arc::new(move |event: &ClockEvent| {
                if let Some(shared) = weak.upgrade() {
                    let generation = shared.signal.bump();
                    tracing::trace!(generation, kind = ?event.kind, "audio player resync");
                }
            }))
        };

        let mut player = Self {
            shared: Arc::clone(&shared),
            subscription: Some(subscription),
            worker: None,
        };
        player.worker = Some(spawn_worker("montage-audio", move || {
            write_loop(&shared, sink)
        })?);
        Ok(player)
    }

    /// Stop the writer thread and detach from the clock.
    pub fn shutdown(&mut self) -> MontageResult<()> {
        if let Some(handle) = self.subscription.take() {
            self.shared.clock.unsubscribe(handle);
        }
        self.shared.signal.close();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            return Err(MontageError::playback("audio playback thread panicked"));
        }
        Ok(())
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!(error = %err, "audio player shutdown failed");
        }
    }
}

fn write_loop(shared: &Shared, mut sink: Box<dyn AudioSink>) {
    let poll = Duration::from_millis(shared.opts.poll_interval_ms.max(1));
    let chunk = shared.opts.chunk_samples as i64;
    let lead = lead_samples(shared.rate, shared.opts.lead_ms);
    let channels = shared.source.channels();
    let mut generation = shared.signal.generation();
    let mut cursor: Option<i64> = None;

    while !shared.signal.is_closed() {
        let g = shared.signal.generation();
        if g != generation {
            generation = g;
            cursor = None;
            if let Err(err) = sink.flush() {
                tracing::warn!(error = %err, "audio sink flush failed");
            }
        }

        if shared.clock.speed() != Rational::ONE {
            shared.signal.wait_change(generation, poll);
            continue;
        }

        let now = shared.rate.frame_at_time(shared.clock.presentation_time());
        let start = resync_cursor(cursor, now);
        if start >= now + lead {
            shared.signal.wait_change(generation, poll);
            continue;
        }

        let mut block = match AudioFrame::new(channels, start, start + chunk - 1) {
            Ok(block) => block,
            Err(err) => {
                tracing::warn!(error = %err, "cannot allocate audio block");
                break;
            }
        };
        if let Err(err) = shared.source.get_frame(&mut block) {
            tracing::warn!(sample = start, error = %err, "audio source failed; writing silence");
            block.clear();
        }
        if let Err(err) = sink.write(&block.interleaved_or_silence()) {
            tracing::warn!(sample = start, error = %err, "audio sink write failed");
        }
        cursor = Some(start + chunk);
    }
    tracing::debug!("audio writer thread exiting");
}

#[cfg(test)]
#[path = "../../tests/unit/playback/audio.rs"]
mod tests;
