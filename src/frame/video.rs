use crate::foundation::core::{Box2i, Rgba};

/// A premultiplied `f32` RGBA image with a window of validity.
///
/// `data` covers `full_window` row-major. Only pixels inside `current_window` hold defined
/// values; everything else in `full_window` reads as transparent through [`RgbaFrame::pixel`].
/// Producers write inside `full_window` and then publish what they wrote via
/// [`RgbaFrame::set_current_window`].
#[derive(Clone, Debug)]
pub struct RgbaFrame {
    full_window: Box2i,
    current_window: Box2i,
    data: Vec<Rgba>,
}

impl RgbaFrame {
    /// Allocate a frame covering `full_window` with an empty current window.
    pub fn new(full_window: Box2i) -> Self {
        let full_window = if full_window.is_empty() {
            Box2i::empty()
        } else {
            full_window
        };
        Self {
            full_window,
            current_window: Box2i::empty(),
            data: vec![Rgba::TRANSPARENT; full_window.area() as usize],
        }
    }

    /// Region covered by the pixel buffer.
    pub fn full_window(&self) -> Box2i {
        self.full_window
    }

    /// Region holding defined pixels (always inside the full window).
    pub fn current_window(&self) -> Box2i {
        self.current_window
    }

    /// Publish the valid region. The window is clipped to the full window.
    pub fn set_current_window(&mut self, window: Box2i) {
        self.current_window = window.intersect(&self.full_window);
    }

    /// Mark the frame fully transparent without touching the buffer.
    pub fn clear(&mut self) {
        self.current_window = Box2i::empty();
    }

    /// Pixel at `(x, y)`, transparent outside the current window.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        if !self.current_window.contains(x, y) {
            return Rgba::TRANSPARENT;
        }
        self.index(x, y)
            .map(|i| self.data[i])
            .unwrap_or(Rgba::TRANSPARENT)
    }

    /// Mutable pixel anywhere in the full window.
    pub fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Rgba> {
        let i = self.index(x, y)?;
        self.data.get_mut(i)
    }

    /// Full-width row `y`, or `None` outside the full window.
    pub fn row(&self, y: i32) -> Option<&[Rgba]> {
        let range = self.row_range(y)?;
        Some(&self.data[range])
    }

    /// Mutable full-width row `y`, or `None` outside the full window.
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [Rgba]> {
        let range = self.row_range(y)?;
        Some(&mut self.data[range])
    }

    /// Raw buffer (row-major over the full window).
    pub fn data(&self) -> &[Rgba] {
        &self.data
    }

    /// Mutable raw buffer (row-major over the full window).
    pub fn data_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    /// Fill `window ∩ full_window` with `color` and make that the current window.
    pub fn fill(&mut self, color: Rgba, window: Box2i) {
        let w = window.intersect(&self.full_window);
        for y in w.min.y..=w.max.y {
            let x0 = (w.min.x - self.full_window.min.x) as usize;
            let x1 = (w.max.x - self.full_window.min.x) as usize;
            if let Some(row) = self.row_mut(y) {
                row[x0..=x1].fill(color);
            }
        }
        self.current_window = w;
    }

    /// Copy the valid region of `src` (clipped to this frame) and make it the current window.
    pub fn copy_from(&mut self, src: &RgbaFrame) {
        let w = src.current_window.intersect(&self.full_window);
        if w.is_empty() {
            self.clear();
            return;
        }
        let sx0 = (w.min.x - src.full_window.min.x) as usize;
        let dx0 = (w.min.x - self.full_window.min.x) as usize;
        let n = w.width() as usize;
        for y in w.min.y..=w.max.y {
            let (Some(s), Some(d)) = (src.row_range(y), self.row_range(y)) else {
                continue;
            };
            let s = &src.data[s][sx0..sx0 + n];
            self.data[d][dx0..dx0 + n].copy_from_slice(s);
        }
        self.current_window = w;
    }

    /// Width of the full window in pixels.
    pub(crate) fn stride(&self) -> usize {
        self.full_window.width() as usize
    }

    /// Re-label the buffer with a same-sized window (pooled reuse).
    pub(crate) fn relabel(&mut self, full_window: Box2i) {
        debug_assert_eq!(full_window.area(), self.full_window.area());
        self.full_window = full_window;
        self.current_window = Box2i::empty();
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.full_window.contains(x, y) {
            return None;
        }
        let dx = (x - self.full_window.min.x) as usize;
        let dy = (y - self.full_window.min.y) as usize;
        Some(dy * self.stride() + dx)
    }

    fn row_range(&self, y: i32) -> Option<std::ops::Range<usize>> {
        if self.full_window.is_empty() || y < self.full_window.min.y || y > self.full_window.max.y
        {
            return None;
        }
        let stride = self.stride();
        let start = (y - self.full_window.min.y) as usize * stride;
        Some(start..start + stride)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/video.rs"]
mod tests;
