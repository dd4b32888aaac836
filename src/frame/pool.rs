use crate::foundation::core::{Box2i, Rgba};
use crate::frame::video::RgbaFrame;
use std::collections::HashMap;

/// Pool configuration for cached frame buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FramePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub(crate) max_pool_bytes: usize,
    /// Maximum number of retained frames per `(width, height)` bucket.
    pub(crate) max_frames_per_bucket: usize,
}

impl Default for FramePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_frames_per_bucket: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrameKey {
    w: u32,
    h: u32,
}

impl FrameKey {
    fn from_window(window: Box2i) -> Self {
        Self {
            w: window.width(),
            h: window.height(),
        }
    }

    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(std::mem::size_of::<Rgba>())
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct FramePoolStats {
    pub(crate) retained_frames: usize,
    pub(crate) retained_bytes: usize,
    pub(crate) alloc_frames: u64,
    pub(crate) dropped_on_release: u64,
}

/// Bounded pool of temporary [`RgbaFrame`] buffers used while compositing.
///
/// Keyed by `(width, height)`; a pooled buffer is re-labeled to the requested window on borrow.
#[derive(Debug)]
pub(crate) struct FramePool {
    opts: FramePoolOpts,
    stats: FramePoolStats,
    buckets: HashMap<FrameKey, Vec<RgbaFrame>>,
}

impl FramePool {
    pub(crate) fn new(opts: FramePoolOpts) -> Self {
        Self {
            opts,
            stats: FramePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn stats(&self) -> FramePoolStats {
        self.stats.clone()
    }

    /// Borrow a frame whose full window is `window` and whose current window is empty.
    pub(crate) fn borrow(&mut self, window: Box2i) -> RgbaFrame {
        let key = FrameKey::from_window(window);
        if let Some(mut f) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_frames = self.stats.retained_frames.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            f.relabel(window);
            return f;
        }

        self.stats.alloc_frames = self.stats.alloc_frames.saturating_add(1);
        RgbaFrame::new(window)
    }

    pub(crate) fn release(&mut self, frame: RgbaFrame) {
        if self.opts.max_pool_bytes == 0 || self.opts.max_frames_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let key = FrameKey::from_window(frame.full_window());
        let bytes = key.byte_len();
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_frames_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.push(frame);
        self.stats.retained_frames = self.stats.retained_frames.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/pool.rs"]
mod tests;
