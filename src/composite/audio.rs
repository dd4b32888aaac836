use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::audio::AudioFrame;

/// Add `src * factor` into `out`.
///
/// The result's current range is the hull of both current ranges (clipped to `out`); samples in
/// that hull defined by neither input are zero-filled.
pub fn mix_add(out: &mut AudioFrame, src: &AudioFrame, factor: f32) -> MontageResult<()> {
    if out.channels() != src.channels() {
        return Err(MontageError::validation(format!(
            "mix_add channel mismatch: out has {}, src has {}",
            out.channels(),
            src.channels()
        )));
    }
    let lo = src.current_min_sample().max(out.full_min_sample());
    let hi = src.current_max_sample().min(out.full_max_sample());
    if src.is_current_empty() || hi < lo {
        return Ok(());
    }

    let (old_lo, old_hi) = (out.current_min_sample(), out.current_max_sample());
    let old_empty = out.is_current_empty();
    let (new_lo, new_hi) = if old_empty {
        (lo, hi)
    } else {
        (old_lo.min(lo), old_hi.max(hi))
    };

    let channels = out.channels();
    for s in new_lo..=new_hi {
        let defined = !old_empty && old_lo <= s && s <= old_hi;
        let in_src = lo <= s && s <= hi;
        let src_frame = if in_src { src.frame(s) } else { None };
        let Some(dst) = out.frame_mut(s) else {
            continue;
        };
        for ch in 0..channels {
            let base = if defined { dst[ch] } else { 0.0 };
            let add = src_frame.map(|f| f[ch] * factor).unwrap_or(0.0);
            dst[ch] = base + add;
        }
    }
    out.set_current_range(new_lo, new_hi);
    Ok(())
}

/// Multiply the defined samples of `frame` by `gain`.
pub fn apply_gain(frame: &mut AudioFrame, gain: f32) {
    if frame.is_current_empty() || gain == 1.0 {
        return;
    }
    for s in frame.current_min_sample()..=frame.current_max_sample() {
        if let Some(f) = frame.frame_mut(s) {
            f.iter_mut().for_each(|v| *v *= gain);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/audio.rs"]
mod tests;
