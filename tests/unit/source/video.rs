use super::*;

#[test]
fn empty_source_clears_output() {
    let mut out = RgbaFrame::new(Box2i::new(0, 0, 3, 3));
    out.fill(Rgba::WHITE, out.full_window());
    EmptyVideoSource.get_frame(0, &mut out).unwrap();
    assert!(out.current_window().is_empty());
}

#[test]
fn solid_color_fills_request_or_fixed_window() {
    let mut out = RgbaFrame::new(Box2i::new(0, 0, 9, 9));
    SolidColorSource::new(Rgba::WHITE)
        .get_frame(-5, &mut out)
        .unwrap();
    assert_eq!(out.current_window(), Box2i::new(0, 0, 9, 9));

    SolidColorSource::with_window(Rgba::BLACK, Box2i::new(8, 8, 20, 20))
        .get_frame(0, &mut out)
        .unwrap();
    assert_eq!(out.current_window(), Box2i::new(8, 8, 9, 9));
    assert_eq!(out.pixel(9, 9), Rgba::BLACK);
    assert_eq!(out.pixel(0, 0), Rgba::TRANSPARENT);
}

#[test]
fn checkerboard_alternates_cells_across_negative_coordinates() {
    let board = CheckerboardSource::new([Rgba::BLACK, Rgba::WHITE], 2).unwrap();
    assert_eq!(board.color_at(0, 0), Rgba::BLACK);
    assert_eq!(board.color_at(1, 1), Rgba::BLACK);
    assert_eq!(board.color_at(2, 0), Rgba::WHITE);
    assert_eq!(board.color_at(-1, 0), Rgba::WHITE);
    assert_eq!(board.color_at(-1, -1), Rgba::BLACK);

    let mut out = RgbaFrame::new(Box2i::new(-2, -2, 3, 3));
    board.get_frame(0, &mut out).unwrap();
    assert_eq!(out.current_window(), out.full_window());
    assert_eq!(out.pixel(-2, 0), Rgba::WHITE);
}

#[test]
fn checkerboard_rejects_zero_cells() {
    assert!(CheckerboardSource::new([Rgba::BLACK, Rgba::WHITE], 0).is_err());
}

#[test]
fn still_image_is_clipped_to_request() {
    let mut img = RgbaFrame::new(Box2i::new(0, 0, 3, 3));
    img.fill(Rgba::WHITE, img.full_window());
    let still = StillImageSource::new(img);
    assert_eq!(still.window(), Box2i::new(0, 0, 3, 3));

    let mut out = RgbaFrame::new(Box2i::new(2, 2, 7, 7));
    still.get_frame(1000, &mut out).unwrap();
    assert_eq!(out.current_window(), Box2i::new(2, 2, 3, 3));
}

#[test]
fn frame_sequence_is_empty_outside_its_range() {
    let frames = (0..3)
        .map(|i| {
            let mut f = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
            f.fill(Rgba::new(i as f32, 0.0, 0.0, 1.0), f.full_window());
            f
        })
        .collect();
    let clip = FrameSequenceSource::new(frames);
    assert_eq!(clip.len(), 3);

    let mut out = RgbaFrame::new(Box2i::new(0, 0, 0, 0));
    clip.get_frame(2, &mut out).unwrap();
    assert_eq!(out.pixel(0, 0).r, 2.0);
    clip.get_frame(3, &mut out).unwrap();
    assert!(out.current_window().is_empty());
    clip.get_frame(-1, &mut out).unwrap();
    assert!(out.current_window().is_empty());
}
