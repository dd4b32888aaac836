use crate::foundation::core::{Box2i, Rgba};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::video::RgbaFrame;
use crate::source::VideoSource;
use crate::source::video::{FrameSequenceSource, SolidColorSource};
use crate::workspace::{Placement, VideoWorkspace};
use std::sync::Arc;

struct Failing;

impl VideoSource for Failing {
    fn get_frame(&self, _frame: i64, _out: &mut RgbaFrame) -> MontageResult<()> {
        Err(MontageError::source("boom"))
    }
}

fn numbered_clip(len: usize) -> Arc<dyn VideoSource> {
    let frames = (0..len)
        .map(|i| {
            let mut f = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
            f.fill(Rgba::new(i as f32, 0.0, 0.0, 1.0), f.full_window());
            f
        })
        .collect();
    Arc::new(FrameSequenceSource::new(frames))
}

#[test]
fn empty_timeline_is_transparent() {
    let ws = VideoWorkspace::new();
    let mut out = RgbaFrame::new(Box2i::new(0, 0, 3, 3));
    out.fill(Rgba::WHITE, out.full_window());
    ws.get_frame(0, &mut out).unwrap();
    assert!(out.current_window().is_empty());
}

#[test]
fn items_pull_offset_source_frames() {
    let ws = VideoWorkspace::new();
    ws.add_item(numbered_clip(10), Placement::new(100, 5).with_offset(4))
        .unwrap();
    let mut out = RgbaFrame::new(Box2i::new(0, 0, 0, 0));

    ws.get_frame(100, &mut out).unwrap();
    assert_eq!(out.pixel(0, 0).r, 4.0);
    ws.get_frame(104, &mut out).unwrap();
    assert_eq!(out.pixel(0, 0).r, 8.0);
    ws.get_frame(105, &mut out).unwrap();
    assert!(out.current_window().is_empty());
}

#[test]
fn higher_z_composites_on_top() {
    let ws = VideoWorkspace::new();
    ws.add_item(
        Arc::new(SolidColorSource::with_window(
            Rgba::from_straight(1.0, 1.0, 1.0, 0.5),
            Box2i::new(2, 2, 3, 3),
        )),
        Placement::new(0, 10).with_z(1),
    )
    .unwrap();
    ws.add_item(
        Arc::new(SolidColorSource::new(Rgba::BLACK)),
        Placement::new(0, 10),
    )
    .unwrap();

    let mut out = RgbaFrame::new(Box2i::new(0, 0, 3, 3));
    ws.get_frame(0, &mut out).unwrap();
    assert_eq!(out.current_window(), Box2i::new(0, 0, 3, 3));
    assert_eq!(out.pixel(0, 0), Rgba::BLACK);
    assert_eq!(out.pixel(3, 3), Rgba::new(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn nested_workspaces_compose() {
    let inner = Arc::new(VideoWorkspace::new());
    inner
        .add_item(numbered_clip(3), Placement::new(0, 3))
        .unwrap();
    let outer = VideoWorkspace::new();
    outer
        .add_item(inner, Placement::new(10, 3).with_offset(0))
        .unwrap();

    let mut out = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
    outer.get_frame(12, &mut out).unwrap();
    assert_eq!(out.pixel(0, 0).r, 2.0);
}

#[test]
fn source_errors_propagate() {
    let ws = VideoWorkspace::new();
    ws.add_item(
        Arc::new(SolidColorSource::new(Rgba::BLACK)),
        Placement::new(0, 1),
    )
    .unwrap();
    ws.add_item(Arc::new(Failing), Placement::new(0, 1).with_z(1))
        .unwrap();
    let mut out = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
    assert!(matches!(
        ws.get_frame(0, &mut out),
        Err(MontageError::Source(_))
    ));
}
