use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::video::RgbaFrame;
use parking_lot::Mutex;
use std::sync::Arc;

/// Display boundary: receives frames at their presentation time.
///
/// Calls arrive from a single player thread, in presentation order.
pub trait VideoSink: Send {
    /// Show `frame` as timeline frame `index`.
    fn present(&mut self, index: i64, frame: &RgbaFrame) -> MontageResult<()>;
}

/// Audio device boundary: consumes interleaved samples in playback order.
pub trait AudioSink: Send {
    /// Channel count expected by [`AudioSink::write`].
    fn channels(&self) -> usize;

    /// Queue interleaved samples for output.
    fn write(&mut self, interleaved: &[f32]) -> MontageResult<()>;

    /// Discard anything queued but not yet played (called after seeks and speed changes).
    fn flush(&mut self) -> MontageResult<()>;
}

/// Video sink recording presented frames; clones share the recording.
#[derive(Clone, Debug, Default)]
pub struct InMemoryVideoSink {
    frames: Arc<Mutex<Vec<(i64, RgbaFrame)>>>,
}

impl InMemoryVideoSink {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices presented so far, in order.
    pub fn indices(&self) -> Vec<i64> {
        self.frames.lock().iter().map(|(i, _)| *i).collect()
    }

    /// Number of presented frames.
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// True when nothing was presented yet.
    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<(i64, RgbaFrame)> {
        self.frames.lock().last().cloned()
    }
}

impl VideoSink for InMemoryVideoSink {
    fn present(&mut self, index: i64, frame: &RgbaFrame) -> MontageResult<()> {
        self.frames.lock().push((index, frame.clone()));
        Ok(())
    }
}

/// Video sink that only logs what would be shown.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingVideoSink;

impl VideoSink for TracingVideoSink {
    fn present(&mut self, index: i64, frame: &RgbaFrame) -> MontageResult<()> {
        let w = frame.current_window();
        tracing::trace!(
            frame = index,
            x = w.min.x,
            y = w.min.y,
            width = w.width(),
            height = w.height(),
            "present"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct AudioCapture {
    samples: Vec<f32>,
    flushes: usize,
}

/// Audio sink recording written samples; clones share the recording.
#[derive(Clone, Debug)]
pub struct InMemoryAudioSink {
    channels: usize,
    capture: Arc<Mutex<AudioCapture>>,
}

impl InMemoryAudioSink {
    /// Recording sink for `channels` channels.
    pub fn new(channels: usize) -> MontageResult<Self> {
        if channels == 0 {
            return Err(MontageError::validation("audio sink channels must be > 0"));
        }
        Ok(Self {
            channels,
            capture: Arc::new(Mutex::new(AudioCapture::default())),
        })
    }

    /// Interleaved samples written so far (flushes do not erase the recording).
    pub fn samples(&self) -> Vec<f32> {
        self.capture.lock().samples.clone()
    }

    /// Written length in sample frames.
    pub fn sample_frames(&self) -> usize {
        self.capture.lock().samples.len() / self.channels
    }

    /// Number of `flush` calls.
    pub fn flushes(&self) -> usize {
        self.capture.lock().flushes
    }
}

impl AudioSink for InMemoryAudioSink {
    fn channels(&self) -> usize {
        self.channels
    }

    fn write(&mut self, interleaved: &[f32]) -> MontageResult<()> {
        if interleaved.len() % self.channels != 0 {
            return Err(MontageError::playback(format!(
                "write of {} samples is not a multiple of {} channels",
                interleaved.len(),
                self.channels
            )));
        }
        self.capture.lock().samples.extend_from_slice(interleaved);
        Ok(())
    }

    fn flush(&mut self) -> MontageResult<()> {
        self.capture.lock().flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sink.rs"]
mod tests;
