use crate::foundation::core::{Box2i, Rgba};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::video::RgbaFrame;
use std::path::Path;

/// Build a frame from straight-alpha 8-bit pixels placed with its top-left corner at `(x, y)`.
///
/// Channel values are taken as linear; no transfer curve is applied.
pub fn frame_from_rgba8(img: &image::RgbaImage, x: i32, y: i32) -> RgbaFrame {
    let window = Box2i::from_origin_size(x, y, img.width(), img.height());
    let mut frame = RgbaFrame::new(window);
    for (dst, px) in frame.data_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = Rgba::from_straight(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        );
    }
    frame.set_current_window(window);
    frame
}

/// Export `window` of a frame as straight-alpha 8-bit pixels.
///
/// Pixels outside the frame's current window export as transparent.
pub fn frame_to_rgba8(frame: &RgbaFrame, window: Box2i) -> image::RgbaImage {
    let mut img = image::RgbaImage::new(window.width(), window.height());
    for (px, py, out) in img.enumerate_pixels_mut() {
        let c = frame.pixel(window.min.x + px as i32, window.min.y + py as i32);
        let s = c.to_straight();
        out.0 = [
            unit_to_u8(s[0]),
            unit_to_u8(s[1]),
            unit_to_u8(s[2]),
            unit_to_u8(s[3]),
        ];
    }
    img
}

/// Decode an image file into a frame anchored at the origin.
pub fn load_image_frame(path: &Path) -> MontageResult<RgbaFrame> {
    let img = image::open(path)
        .map_err(|e| {
            MontageError::source(format!("failed to decode image '{}': {e}", path.display()))
        })?
        .to_rgba8();
    Ok(frame_from_rgba8(&img, 0, 0))
}

/// Write `window` of a frame as a PNG file.
pub fn save_frame_png(frame: &RgbaFrame, window: Box2i, path: &Path) -> MontageResult<()> {
    if window.is_empty() {
        return Err(MontageError::validation("cannot export an empty window"));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            MontageError::Other(anyhow::anyhow!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    frame_to_rgba8(frame, window)
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| {
            MontageError::Other(anyhow::anyhow!(
                "failed to write PNG '{}': {e}",
                path.display()
            ))
        })
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/frame/convert.rs"]
mod tests;
