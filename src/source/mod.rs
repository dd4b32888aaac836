//! Pull-based sources: producers of video frames and audio samples for any frame index.
//!
//! A consumer allocates the output buffer with the region it wants (the full window or sample
//! range), passes it down the graph and reads back the region the source defined. Filters pull
//! their inputs the same way, so graphs of any depth compose without the source knowing who
//! consumes it.

use crate::foundation::error::MontageResult;
use crate::frame::audio::AudioFrame;
use crate::frame::video::RgbaFrame;

pub(crate) mod audio;
pub(crate) mod filter;
pub(crate) mod registry;
pub(crate) mod video;

/// Producer of video frames.
pub trait VideoSource: Send + Sync {
    /// Render frame `frame` into `out`.
    ///
    /// `out.full_window()` is chosen by the caller. The source writes what it can inside that
    /// window and publishes it with [`RgbaFrame::set_current_window`]; frames with no content
    /// leave the current window empty. Any index may be requested, including negative ones.
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()>;
}

/// Producer of interleaved audio samples.
pub trait AudioSource: Send + Sync {
    /// Channel count of every frame this source produces.
    fn channels(&self) -> usize;

    /// Fill `out` over its full sample range, publishing the defined part with
    /// [`AudioFrame::set_current_range`].
    fn get_frame(&self, out: &mut AudioFrame) -> MontageResult<()>;
}
