use crate::foundation::core::{Box2i, Rgba};
use crate::frame::video::RgbaFrame;
use rayon::prelude::*;

/// Composite `src` over `dst` (premultiplied): `src*opacity + dst*(1 - src.a*opacity)`.
pub fn over(dst: Rgba, src: Rgba, opacity: f32) -> Rgba {
    let opacity = unit(opacity);
    if opacity <= 0.0 {
        return dst;
    }
    let s = src.scale(opacity);
    let inv = 1.0 - s.a;
    Rgba::new(
        s.r + dst.r * inv,
        s.g + dst.g * inv,
        s.b + dst.b * inv,
        s.a + dst.a * inv,
    )
}

/// Linear blend `a*(1-mix) + b*mix`.
pub fn cross_fade(a: Rgba, b: Rgba, mix: f32) -> Rgba {
    let mix = unit(mix);
    a.scale(1.0 - mix) + b.scale(mix)
}

/// Composite the valid region of `src` over `dst` in place.
///
/// The resulting current window is the union of `dst`'s window and `src`'s window (clipped to
/// `dst`). Pixels in that union which neither input defined become transparent.
pub fn over_frame(dst: &mut RgbaFrame, src: &RgbaFrame, opacity: f32) {
    let opacity = unit(opacity);
    if opacity <= 0.0 {
        return;
    }
    let full = dst.full_window();
    let region = src.current_window().intersect(&full);
    if region.is_empty() {
        return;
    }
    let old = dst.current_window();
    let window = old.union(&region);
    let stride = dst.stride();

    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(ri, row)| {
            let y = full.min.y + ri as i32;
            if y < window.min.y || y > window.max.y {
                return;
            }
            for x in window.min.x..=window.max.x {
                let i = (x - full.min.x) as usize;
                let d = if old.contains(x, y) {
                    row[i]
                } else {
                    Rgba::TRANSPARENT
                };
                let s = if region.contains(x, y) {
                    src.pixel(x, y)
                } else {
                    Rgba::TRANSPARENT
                };
                row[i] = over(d, s, opacity);
            }
        });
    dst.set_current_window(window);
}

/// Blend two frames into `out`: `mix <= 0` copies `a`, `mix >= 1` copies `b`.
///
/// In between, the current window is `(a ∪ b) ∩ out.full_window`.
pub fn cross_fade_frame(out: &mut RgbaFrame, a: &RgbaFrame, b: &RgbaFrame, mix: f32) {
    let mix = unit(mix);
    if mix <= 0.0 {
        out.copy_from(a);
        return;
    }
    if mix >= 1.0 {
        out.copy_from(b);
        return;
    }

    let full = out.full_window();
    let window = a
        .current_window()
        .union(&b.current_window())
        .intersect(&full);
    let stride = out.stride();
    blend_rows(out.data_mut(), full, window, stride, |x, y| {
        cross_fade(a.pixel(x, y), b.pixel(x, y), mix)
    });
    out.set_current_window(window);
}

fn blend_rows<F>(data: &mut [Rgba], full: Box2i, window: Box2i, stride: usize, f: F)
where
    F: Fn(i32, i32) -> Rgba + Sync,
{
    if window.is_empty() || stride == 0 {
        return;
    }
    data.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(ri, row)| {
            let y = full.min.y + ri as i32;
            if y < window.min.y || y > window.max.y {
                return;
            }
            for x in window.min.x..=window.max.x {
                row[(x - full.min.x) as usize] = f(x, y);
            }
        });
}

/// Clamp to `[0, 1]`; NaN counts as 0.
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/video.rs"]
mod tests;
