use std::collections::BTreeMap;

use crate::{
    animation::func::Keyframes,
    foundation::core::{Box2i, FrameRate, Point, Rgba},
    foundation::error::{MontageError, MontageResult},
    resample::fir::ResampleKernel,
    workspace::Placement,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete project file.
///
/// Video items are placed in frames of `frame_rate`; audio items are placed in samples of
/// `audio.sample_rate`.
pub struct ProjectDef {
    /// Format version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Output canvas.
    pub canvas: CanvasDef,
    /// Video frame rate.
    pub frame_rate: FrameRate,
    /// Audio output layout.
    #[serde(default)]
    pub audio: AudioDef,
    /// Source table keyed by stable names.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceDef>,
    /// Video timeline items.
    #[serde(default)]
    pub video: Vec<ItemDef>,
    /// Audio timeline items.
    #[serde(default)]
    pub audio_items: Vec<ItemDef>,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output canvas size in pixels; the canvas covers `(0, 0)..(width, height)`.
pub struct CanvasDef {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasDef {
    /// Canvas as a window.
    pub fn window(&self) -> Box2i {
        Box2i::from_origin_size(0, 0, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Audio output layout.
pub struct AudioDef {
    /// Samples per second.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Interleaved channel count.
    #[serde(default = "default_channels")]
    pub channels: usize,
}

impl Default for AudioDef {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

fn default_sample_rate() -> u32 {
    48_000
}

fn default_channels() -> usize {
    2
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A timeline item referencing a named source.
pub struct ItemDef {
    /// Key into [`ProjectDef::sources`].
    pub source: String,
    /// Timeline placement.
    #[serde(flatten)]
    pub placement: Placement,
    /// Optional label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Source definition. Colors are straight-alpha linear RGBA.
pub enum SourceDef {
    /// Constant color, optionally restricted to a window.
    Solid {
        /// Fill color.
        color: [f32; 4],
        /// Region to fill; unbounded when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<WindowDef>,
    },
    /// Two-color checkerboard.
    Checkerboard {
        /// Colors of even and odd cells.
        colors: [[f32; 4]; 2],
        /// Cell edge in pixels.
        cell_size: u32,
    },
    /// Still image file.
    Image {
        /// Path relative to the project file.
        path: String,
    },
    /// Sine tone on every channel of the project's audio layout.
    Sine {
        /// Frequency in Hz.
        frequency: f64,
        /// Peak amplitude.
        #[serde(default = "default_amplitude")]
        amplitude: f32,
    },
    /// Audio silence.
    Silence,
    /// Cross-fade between two video sources.
    CrossFade {
        /// Source shown at mix 0.
        a: String,
        /// Source shown at mix 1.
        b: String,
        /// Mix factor over frames.
        mix: Keyframes,
    },
    /// One video source composited over another.
    Over {
        /// Bottom layer.
        base: String,
        /// Top layer.
        overlay: String,
        /// Opacity of `overlay` over frames.
        opacity: Keyframes,
    },
    /// Resampled video source.
    Scale {
        /// Source to resample.
        source: String,
        /// Horizontal factor.
        factor_x: f64,
        /// Vertical factor.
        factor_y: f64,
        /// Anchor in source pixels.
        #[serde(default)]
        source_point: Point,
        /// Where the anchor lands in output pixels.
        #[serde(default)]
        target_point: Point,
        /// Reconstruction kernel.
        #[serde(default = "default_kernel")]
        kernel: ResampleKernel,
    },
    /// Audio source with a constant gain.
    Gain {
        /// Source to scale.
        source: String,
        /// Linear gain.
        gain: f32,
    },
}

fn default_amplitude() -> f32 {
    0.5
}

fn default_kernel() -> ResampleKernel {
    ResampleKernel::Triangle
}

impl SourceDef {
    /// Names of the sources this one pulls from.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::CrossFade { a, b, .. } => vec![a.as_str(), b.as_str()],
            Self::Over { base, overlay, .. } => vec![base.as_str(), overlay.as_str()],
            Self::Scale { source, .. } | Self::Gain { source, .. } => vec![source.as_str()],
            _ => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Pixel rectangle given by its top-left corner and size.
pub struct WindowDef {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl WindowDef {
    /// As an inclusive box.
    pub fn to_box(self) -> Box2i {
        Box2i::from_origin_size(self.x, self.y, self.width, self.height)
    }
}

/// Convert a straight-alpha color definition to the premultiplied working format.
pub(crate) fn color_from_def(c: [f32; 4]) -> MontageResult<Rgba> {
    if c.iter().any(|v| !v.is_finite()) {
        return Err(MontageError::validation("color components must be finite"));
    }
    let [r, g, b, a] = c;
    Ok(Rgba::from_straight(r, g, b, a.clamp(0.0, 1.0)))
}

impl ProjectDef {
    /// Structural checks that do not touch the filesystem.
    pub fn validate(&self) -> MontageResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(MontageError::validation("canvas width/height must be > 0"));
        }
        if self.audio.sample_rate == 0 || self.audio.channels == 0 {
            return Err(MontageError::validation(
                "audio sample_rate and channels must be > 0",
            ));
        }

        for (name, def) in &self.sources {
            for input in def.inputs() {
                if !self.sources.contains_key(input) {
                    return Err(MontageError::validation(format!(
                        "source '{name}' references missing source '{input}'"
                    )));
                }
            }
            match def {
                SourceDef::Image { path } => validate_rel_path(path, "image path")?,
                SourceDef::CrossFade { mix, .. } => mix.validate()?,
                SourceDef::Over { opacity, .. } => opacity.validate()?,
                _ => {}
            }
        }

        for (list, item) in self
            .video
            .iter()
            .map(|i| ("video", i))
            .chain(self.audio_items.iter().map(|i| ("audio_items", i)))
        {
            if !self.sources.contains_key(&item.source) {
                return Err(MontageError::validation(format!(
                    "{list} item references missing source '{}'",
                    item.source
                )));
            }
            item.placement.validate()?;
        }
        Ok(())
    }
}

fn validate_rel_path(path: &str, field: &str) -> MontageResult<()> {
    if path.trim().is_empty() {
        return Err(MontageError::validation(format!("{field} must be non-empty")));
    }
    let p = path.replace('\\', "/");
    if p.starts_with('/') {
        return Err(MontageError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if p.split('/').any(|part| part == "..") {
        return Err(MontageError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/project/model.rs"]
mod tests;
