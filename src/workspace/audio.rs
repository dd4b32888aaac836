use crate::composite::audio::mix_add;
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::audio::AudioFrame;
use crate::source::AudioSource;
use crate::workspace::AudioWorkspace;

impl AudioWorkspace {
    /// Empty audio workspace producing `channels` channels.
    pub fn new(channels: usize) -> MontageResult<Self> {
        if channels == 0 {
            return Err(MontageError::validation(
                "audio workspace channels must be > 0",
            ));
        }
        Ok(Self::with_channels(channels))
    }
}

impl AudioSource for AudioWorkspace {
    fn channels(&self) -> usize {
        self.channels
    }

    /// Mix every item overlapping the requested range, each clipped to its own span.
    #[tracing::instrument(level = "trace", skip(self, out), fields(lo = out.full_min_sample(), hi = out.full_max_sample()))]
    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()> {
        if out.channels() != self.channels {
            return Err(MontageError::validation(format!(
                "audio workspace has {} channels, frame has {}",
                self.channels,
                out.channels()
            )));
        }
        out.clear();
        let (lo, hi) = (out.full_min_sample(), out.full_max_sample());
        if hi < lo {
            return Ok(());
        }

        for item in self.overlapping(lo, hi) {
            let p = item.placement();
            let start = lo.max(p.x);
            let end = hi.min(p.end() - 1);
            let mut block = AudioFrame::new(
                self.channels,
                p.source_frame(start),
                p.source_frame(end),
            )?;
            item.source().get_frame(&mut block)?;
            // Back onto the timeline axis.
            block.shift(p.x - p.offset);
            mix_add(out, &block, 1.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/audio.rs"]
mod tests;
