use crate::foundation::error::{MontageError, MontageResult};

/// Interleaved `f32` audio block over an inclusive range of timeline sample indices.
///
/// Same window-of-validity contract as [`crate::RgbaFrame`], along the sample axis: only samples
/// in `current_min_sample..=current_max_sample` are defined, the rest of the full range reads as
/// silence.
#[derive(Clone, Debug)]
pub struct AudioFrame {
    channels: usize,
    full_min_sample: i64,
    full_max_sample: i64,
    current_min_sample: i64,
    current_max_sample: i64,
    data: Vec<f32>,
}

impl AudioFrame {
    /// Allocate a frame for samples `full_min..=full_max` with an empty current range.
    pub fn new(channels: usize, full_min_sample: i64, full_max_sample: i64) -> MontageResult<Self> {
        if channels == 0 {
            return Err(MontageError::validation("AudioFrame channels must be > 0"));
        }
        if full_max_sample < full_min_sample.saturating_sub(1) {
            return Err(MontageError::validation(
                "AudioFrame full_max_sample must be >= full_min_sample - 1",
            ));
        }
        let len = usize::try_from(full_max_sample - full_min_sample + 1)
            .ok()
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| MontageError::validation("AudioFrame size overflow"))?;
        Ok(Self {
            channels,
            full_min_sample,
            full_max_sample,
            current_min_sample: full_min_sample,
            current_max_sample: full_min_sample - 1,
            data: vec![0.0; len],
        })
    }

    /// Channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// First sample covered by the buffer.
    pub fn full_min_sample(&self) -> i64 {
        self.full_min_sample
    }

    /// Last sample covered by the buffer (inclusive).
    pub fn full_max_sample(&self) -> i64 {
        self.full_max_sample
    }

    /// First defined sample.
    pub fn current_min_sample(&self) -> i64 {
        self.current_min_sample
    }

    /// Last defined sample (inclusive).
    pub fn current_max_sample(&self) -> i64 {
        self.current_max_sample
    }

    /// Number of sample frames the buffer covers.
    pub fn full_len(&self) -> usize {
        (self.full_max_sample - self.full_min_sample + 1).max(0) as usize
    }

    /// Number of defined sample frames.
    pub fn current_len(&self) -> usize {
        (self.current_max_sample - self.current_min_sample + 1).max(0) as usize
    }

    /// Return `true` when no samples are defined.
    pub fn is_current_empty(&self) -> bool {
        self.current_max_sample < self.current_min_sample
    }

    /// Publish the defined range, clipped to the full range.
    pub fn set_current_range(&mut self, min: i64, max: i64) {
        let min = min.max(self.full_min_sample);
        let max = max.min(self.full_max_sample);
        if max < min {
            self.clear();
        } else {
            self.current_min_sample = min;
            self.current_max_sample = max;
        }
    }

    /// Mark the frame silent without touching the buffer.
    pub fn clear(&mut self) {
        self.current_min_sample = self.full_min_sample;
        self.current_max_sample = self.full_min_sample - 1;
    }

    /// Sample value, `0.0` outside the current range or channel count.
    pub fn sample(&self, sample: i64, channel: usize) -> f32 {
        if channel >= self.channels
            || sample < self.current_min_sample
            || sample > self.current_max_sample
        {
            return 0.0;
        }
        self.frame(sample).map(|f| f[channel]).unwrap_or(0.0)
    }

    /// All channels of one sample frame anywhere in the full range.
    pub fn frame(&self, sample: i64) -> Option<&[f32]> {
        let i = self.offset(sample)?;
        Some(&self.data[i..i + self.channels])
    }

    /// Mutable channels of one sample frame anywhere in the full range.
    pub fn frame_mut(&mut self, sample: i64) -> Option<&mut [f32]> {
        let i = self.offset(sample)?;
        let c = self.channels;
        Some(&mut self.data[i..i + c])
    }

    /// Raw interleaved buffer over the full range.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved buffer over the full range.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Move the frame along the sample axis by `delta` (both full and current ranges).
    pub fn shift(&mut self, delta: i64) {
        self.full_min_sample += delta;
        self.full_max_sample += delta;
        self.current_min_sample += delta;
        self.current_max_sample += delta;
    }

    /// Copy of the full range with silence outside the current range.
    pub fn interleaved_or_silence(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.data.len()];
        if let (Some(a), Some(b)) = (
            self.offset(self.current_min_sample),
            self.offset(self.current_max_sample),
        ) {
            let end = b + self.channels;
            out[a..end].copy_from_slice(&self.data[a..end]);
        }
        out
    }

    pub(crate) fn offset(&self, sample: i64) -> Option<usize> {
        if sample < self.full_min_sample || sample > self.full_max_sample {
            return None;
        }
        Some((sample - self.full_min_sample) as usize * self.channels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/audio.rs"]
mod tests;
