use crate::composite::video::over_frame;
use crate::foundation::error::MontageResult;
use crate::frame::video::RgbaFrame;
use crate::source::VideoSource;
use crate::workspace::VideoWorkspace;

impl VideoWorkspace {
    /// Empty video workspace.
    pub fn new() -> Self {
        Self::with_channels(0)
    }
}

impl Default for VideoWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSource for VideoWorkspace {
    /// Composite the items active at `frame` bottom-to-top with `over`.
    #[tracing::instrument(level = "trace", skip(self, out))]
    fn get_frame(&self, frame: i64, out: &mut RgbaFrame) -> MontageResult<()> {
        let list = self.composite_list(frame);
        out.clear();
        let mut layers = list.iter();
        let Some(bottom) = layers.next() else {
            return Ok(());
        };
        bottom
            .source()
            .get_frame(bottom.placement().source_frame(frame), out)?;

        for item in layers {
            let mut layer = self.pool.lock().borrow(out.full_window());
            let pulled = item
                .source()
                .get_frame(item.placement().source_frame(frame), &mut layer);
            if pulled.is_ok() {
                over_frame(out, &layer, 1.0);
            }
            self.pool.lock().release(layer);
            pulled?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/video.rs"]
mod tests;
