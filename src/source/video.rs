use crate::foundation::core::{Box2i, Rgba};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::convert::load_image_frame;
use crate::frame::video::RgbaFrame;
use crate::source::VideoSource;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Source with no content at any frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyVideoSource;

impl VideoSource for EmptyVideoSource {
    fn get_frame(&self, _frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        out.clear();
        Ok(())
    }
}

/// Constant color, either everywhere or inside a fixed window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidColorSource {
    /// Fill color (premultiplied).
    pub color: Rgba,
    /// Region to fill; `None` fills whatever is requested.
    pub window: Option<Box2i>,
}

impl SolidColorSource {
    /// Unbounded solid color.
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            window: None,
        }
    }

    /// Solid color restricted to `window`.
    pub fn with_window(color: Rgba, window: Box2i) -> Self {
        Self {
            color,
            window: Some(window),
        }
    }
}

impl VideoSource for SolidColorSource {
    fn get_frame(&self, _frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        let window = self.window.unwrap_or_else(|| out.full_window());
        out.fill(self.color, window);
        Ok(())
    }
}

/// Unbounded two-color checkerboard; the cell containing `(0, 0)` uses `colors[0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckerboardSource {
    colors: [Rgba; 2],
    cell_size: u32,
}

impl CheckerboardSource {
    /// Build a checkerboard with square cells of `cell_size` pixels.
    pub fn new(colors: [Rgba; 2], cell_size: u32) -> MontageResult<Self> {
        if cell_size == 0 {
            return Err(MontageError::validation(
                "checkerboard cell_size must be > 0",
            ));
        }
        Ok(Self { colors, cell_size })
    }

    /// Color at pixel `(x, y)`.
    pub fn color_at(&self, x: i32, y: i32) -> Rgba {
        let c = i64::from(self.cell_size);
        let parity = (i64::from(x).div_euclid(c) + i64::from(y).div_euclid(c)).rem_euclid(2);
        self.colors[parity as usize]
    }
}

impl VideoSource for CheckerboardSource {
    fn get_frame(&self, _frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        let full = out.full_window();
        if full.is_empty() {
            out.clear();
            return Ok(());
        }
        let stride = out.stride();
        out.data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(ri, row)| {
                let y = full.min.y + ri as i32;
                for (ci, px) in row.iter_mut().enumerate() {
                    *px = self.color_at(full.min.x + ci as i32, y);
                }
            });
        out.set_current_window(full);
        Ok(())
    }
}

/// One still image shown at every frame.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    frame: Arc<RgbaFrame>,
}

impl StillImageSource {
    /// Show the valid region of `frame`.
    pub fn new(frame: RgbaFrame) -> Self {
        Self {
            frame: Arc::new(frame),
        }
    }

    /// Decode an image file; its top-left pixel lands at `(0, 0)`.
    pub fn from_path(path: &Path) -> MontageResult<Self> {
        Ok(Self::new(load_image_frame(path)?))
    }

    /// Region the image covers.
    pub fn window(&self) -> Box2i {
        self.frame.current_window()
    }
}

impl VideoSource for StillImageSource {
    fn get_frame(&self, _frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        out.copy_from(&self.frame);
        Ok(())
    }
}

/// In-memory clip: frame `i` of the sequence for `0 <= i < len`, nothing elsewhere.
#[derive(Clone, Debug, Default)]
pub struct FrameSequenceSource {
    frames: Vec<Arc<RgbaFrame>>,
}

impl FrameSequenceSource {
    /// Clip made of `frames` in order.
    pub fn new(frames: Vec<RgbaFrame>) -> Self {
        Self {
            frames: frames.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of frames in the clip.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl VideoSource for FrameSequenceSource {
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        match usize::try_from(frame).ok().and_then(|i| self.frames.get(i)) {
            Some(f) => out.copy_from(f),
            None => out.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/video.rs"]
mod tests;
