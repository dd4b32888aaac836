use crate::animation::func::FrameFunction;
use crate::composite::video::{cross_fade_frame, over_frame};
use crate::foundation::error::MontageResult;
use crate::frame::video::RgbaFrame;
use crate::resample::scale::{ScaleParams, scale_frame, source_window_for};
use crate::source::VideoSource;
use std::sync::Arc;

/// Blends two video sources; `mix` (0 = all `a`, 1 = all `b`) is sampled at each frame index.
pub struct CrossFadeSource {
    a: Arc<dyn VideoSource>,
    b: Arc<dyn VideoSource>,
    mix: Arc<dyn FrameFunction>,
}

impl CrossFadeSource {
    /// Cross-fade from `a` to `b` following `mix`.
    pub fn new(
        a: Arc<dyn VideoSource>,
        b: Arc<dyn VideoSource>,
        mix: Arc<dyn FrameFunction>,
    ) -> Self {
        Self { a, b, mix }
    }
}

impl VideoSource for CrossFadeSource {
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        let mix = self.mix.value_at(frame as f64) as f32;
        // Only one side contributes at the endpoints.
        if mix.is_nan() || mix <= 0.0 {
            return self.a.get_frame(frame, out);
        }
        if mix >= 1.0 {
            return self.b.get_frame(frame, out);
        }

        let mut a = RgbaFrame::new(out.full_window());
        let mut b = RgbaFrame::new(out.full_window());
        self.a.get_frame(frame, &mut a)?;
        self.b.get_frame(frame, &mut b)?;
        cross_fade_frame(out, &a, &b, mix);
        Ok(())
    }
}

/// Composites `overlay` over `base` with an animated opacity.
pub struct OverSource {
    base: Arc<dyn VideoSource>,
    overlay: Arc<dyn VideoSource>,
    opacity: Arc<dyn FrameFunction>,
}

impl OverSource {
    /// `overlay` over `base`, with `opacity` sampled at each frame index.
    pub fn new(
        base: Arc<dyn VideoSource>,
        overlay: Arc<dyn VideoSource>,
        opacity: Arc<dyn FrameFunction>,
    ) -> Self {
        Self {
            base,
            overlay,
            opacity,
        }
    }
}

impl VideoSource for OverSource {
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        self.base.get_frame(frame, out)?;
        let opacity = self.opacity.value_at(frame as f64) as f32;
        if opacity.is_nan() || opacity <= 0.0 {
            return Ok(());
        }
        let mut top = RgbaFrame::new(out.full_window());
        self.overlay.get_frame(frame, &mut top)?;
        over_frame(out, &top, opacity);
        Ok(())
    }
}

/// Resamples another source.
///
/// Only the source region the filter actually reads for the requested output window is pulled.
pub struct ScaleSource {
    source: Arc<dyn VideoSource>,
    params: ScaleParams,
}

impl ScaleSource {
    /// Scale `source` with validated `params`.
    pub fn new(source: Arc<dyn VideoSource>, params: ScaleParams) -> MontageResult<Self> {
        params.validate()?;
        Ok(Self { source, params })
    }

    /// Mapping in use.
    pub fn params(&self) -> &ScaleParams {
        &self.params
    }
}

impl VideoSource for ScaleSource {
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        let need = source_window_for(&self.params, out.full_window())?;
        if need.is_empty() {
            out.clear();
            return Ok(());
        }
        let mut src = RgbaFrame::new(need);
        self.source.get_frame(frame, &mut src)?;
        scale_frame(out, &src, &self.params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/filter.rs"]
mod tests;
