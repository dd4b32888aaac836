use super::*;

#[test]
fn rgba8_roundtrip_preserves_opaque_pixels() {
    let mut img = image::RgbaImage::new(2, 1);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));

    let frame = frame_from_rgba8(&img, 5, 7);
    assert_eq!(frame.current_window(), Box2i::new(5, 7, 6, 7));
    assert_eq!(frame.pixel(5, 7), Rgba::new(1.0, 0.0, 0.0, 1.0));

    let back = frame_to_rgba8(&frame, frame.full_window());
    assert_eq!(back, img);
}

#[test]
fn import_premultiplies_alpha() {
    let mut img = image::RgbaImage::new(1, 1);
    img.put_pixel(0, 0, image::Rgba([255, 255, 255, 51]));
    let frame = frame_from_rgba8(&img, 0, 0);
    let px = frame.pixel(0, 0);
    assert!((px.r - 0.2).abs() < 1e-6);
    assert!((px.a - 0.2).abs() < 1e-6);
}

#[test]
fn export_outside_current_window_is_transparent() {
    let mut frame = RgbaFrame::new(Box2i::new(0, 0, 1, 0));
    frame.fill(Rgba::WHITE, Box2i::new(0, 0, 0, 0));
    let img = frame_to_rgba8(&frame, Box2i::new(0, 0, 2, 0));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(2, 0).0, [0, 0, 0, 0]);
}

#[test]
fn save_rejects_empty_window() {
    let frame = RgbaFrame::new(Box2i::new(0, 0, 1, 1));
    let err = save_frame_png(&frame, Box2i::empty(), Path::new("unused.png")).unwrap_err();
    assert!(err.to_string().contains("empty window"));
}
