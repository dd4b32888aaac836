use crate::composite::audio::apply_gain;
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::audio::AudioFrame;
use crate::source::AudioSource;
use std::sync::Arc;

/// Source that defines no samples.
#[derive(Clone, Copy, Debug)]
pub struct SilenceSource {
    channels: usize,
}

impl SilenceSource {
    /// Silence with `channels` channels.
    pub fn new(channels: usize) -> MontageResult<Self> {
        if channels == 0 {
            return Err(MontageError::validation("silence channels must be > 0"));
        }
        Ok(Self { channels })
    }
}

impl AudioSource for SilenceSource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()> {
        out.clear();
        Ok(())
    }
}

/// In-memory interleaved PCM defining samples `0..len`.
#[derive(Clone, Debug)]
pub struct PcmClipSource {
    channels: usize,
    samples: Arc<Vec<f32>>,
}

impl PcmClipSource {
    /// Wrap interleaved samples; the length must be a multiple of `channels`.
    pub fn new(channels: usize, interleaved: Vec<f32>) -> MontageResult<Self> {
        if channels == 0 {
            return Err(MontageError::validation("PCM clip channels must be > 0"));
        }
        if interleaved.len() % channels != 0 {
            return Err(MontageError::validation(format!(
                "PCM clip length {} is not a multiple of {channels} channels",
                interleaved.len()
            )));
        }
        Ok(Self {
            channels,
            samples: Arc::new(interleaved),
        })
    }

    /// Clip length in sample frames.
    pub fn len(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// True when the clip holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AudioSource for PcmClipSource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()> {
        check_channels(self.channels, out)?;
        let lo = out.full_min_sample().max(0);
        let hi = out.full_max_sample().min(self.len() as i64 - 1);
        if hi < lo {
            out.clear();
            return Ok(());
        }
        let ch = self.channels;
        for s in lo..=hi {
            let start = s as usize * ch;
            if let Some(dst) = out.frame_mut(s) {
                dst.copy_from_slice(&self.samples[start..start + ch]);
            }
        }
        out.set_current_range(lo, hi);
        Ok(())
    }
}

/// Unbounded sine tone, identical on every channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineSource {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude.
    pub amplitude: f32,
    /// Samples per second of the sample axis.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: usize,
}

impl SineSource {
    /// Validated sine source.
    pub fn new(
        frequency: f64,
        amplitude: f32,
        sample_rate: u32,
        channels: usize,
    ) -> MontageResult<Self> {
        if !frequency.is_finite() || !amplitude.is_finite() {
            return Err(MontageError::validation("sine parameters must be finite"));
        }
        if sample_rate == 0 || channels == 0 {
            return Err(MontageError::validation(
                "sine sample_rate and channels must be > 0",
            ));
        }
        Ok(Self {
            frequency,
            amplitude,
            sample_rate,
            channels,
        })
    }

    /// Value at sample index `sample`.
    pub fn value_at(&self, sample: i64) -> f32 {
        // Wrap to a single cycle before the trig call.
        let period = f64::from(self.sample_rate);
        let cycles = self.frequency * (sample as f64 / period);
        let phase = cycles.rem_euclid(1.0) * std::f64::consts::TAU;
        self.amplitude * phase.sin() as f32
    }
}

impl AudioSource for SineSource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()> {
        check_channels(self.channels, out)?;
        let (lo, hi) = (out.full_min_sample(), out.full_max_sample());
        if hi < lo {
            out.clear();
            return Ok(());
        }
        for s in lo..=hi {
            let v = self.value_at(s);
            if let Some(dst) = out.frame_mut(s) {
                dst.fill(v);
            }
        }
        out.set_current_range(lo, hi);
        Ok(())
    }
}

/// Scales another audio source by a constant gain.
pub struct GainSource {
    source: Arc<dyn AudioSource>,
    gain: f32,
}

impl GainSource {
    /// Wrap `source` with a linear `gain`.
    pub fn new(source: Arc<dyn AudioSource>, gain: f32) -> MontageResult<Self> {
        if !gain.is_finite() {
            return Err(MontageError::validation("gain must be finite"));
        }
        Ok(Self { source, gain })
    }

    /// Linear gain factor.
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl AudioSource for GainSource {
    fn channels(&self) -> usize {
        self.source.channels()
    }

    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()> {
        self.source.get_frame(out)?;
        apply_gain(out, self.gain);
        Ok(())
    }
}

fn check_channels(expected: usize, out: &AudioFrame) -> MontageResult<()> {
    if out.channels() != expected {
        return Err(MontageError::validation(format!(
            "audio source has {expected} channels, frame has {}",
            out.channels()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/source/audio.rs"]
mod tests;
