use crate::foundation::core::{Box2i, Point, Rgba};
use crate::foundation::error::{MontageError, MontageResult};
use crate::frame::video::RgbaFrame;
use crate::resample::fir::{FirFilter, ResampleKernel};
use rayon::prelude::*;

/// Mapping and filter used by [`scale_frame`].
///
/// Source coordinate `source_point` lands on target coordinate `target_point`; distances from
/// that anchor are multiplied by `factor_x`/`factor_y`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleParams {
    /// Horizontal scale factor (> 0).
    pub factor_x: f64,
    /// Vertical scale factor (> 0).
    pub factor_y: f64,
    /// Anchor in source pixel coordinates.
    pub source_point: Point,
    /// Where the anchor lands in target pixel coordinates.
    pub target_point: Point,
    /// Reconstruction kernel.
    pub kernel: ResampleKernel,
}

impl ScaleParams {
    /// Uniform scale anchored at the origin.
    pub fn uniform(factor: f64, kernel: ResampleKernel) -> Self {
        Self {
            factor_x: factor,
            factor_y: factor,
            source_point: Point::ORIGIN,
            target_point: Point::ORIGIN,
            kernel,
        }
    }

    /// Check factors and anchors are finite and factors positive.
    pub fn validate(&self) -> MontageResult<()> {
        let finite = [
            self.factor_x,
            self.factor_y,
            self.source_point.x,
            self.source_point.y,
            self.target_point.x,
            self.target_point.y,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(MontageError::validation("scale parameters must be finite"));
        }
        if self.factor_x <= 0.0 || self.factor_y <= 0.0 {
            return Err(MontageError::validation("scale factors must be > 0"));
        }
        Ok(())
    }

    fn x_axis(&self) -> Axis {
        Axis {
            factor: self.factor_x,
            source: self.source_point.x,
            target: self.target_point.x,
            kernel: self.kernel,
        }
    }

    fn y_axis(&self) -> Axis {
        Axis {
            factor: self.factor_y,
            source: self.source_point.y,
            target: self.target_point.y,
            kernel: self.kernel,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Axis {
    factor: f64,
    source: f64,
    target: f64,
    kernel: ResampleKernel,
}

impl Axis {
    fn sub(self) -> f64 {
        (1.0 / self.factor).max(1.0)
    }

    /// Filter support in source pixels.
    fn support(self) -> f64 {
        self.kernel.radius() * self.sub()
    }

    fn to_source(self, t: f64) -> f64 {
        (t - self.target) / self.factor + self.source
    }

    fn to_target(self, s: f64) -> f64 {
        (s - self.source) * self.factor + self.target
    }

    /// Source pixels `[lo, hi]` a filter could touch while producing targets `[lo, hi]`.
    fn source_span(self, lo: i32, hi: i32) -> (i64, i64) {
        let s0 = self.to_source(f64::from(lo)) - self.support();
        let s1 = self.to_source(f64::from(hi) + 1.0) + self.support();
        (s0.floor() as i64 - 1, s1.ceil() as i64 + 1)
    }

    /// Target pixels `[lo, hi]` that may receive energy from source pixels `[lo, hi]`.
    fn target_span(self, lo: i32, hi: i32) -> (i64, i64) {
        let t0 = self.to_target(f64::from(lo) - self.support());
        let t1 = self.to_target(f64::from(hi) + 1.0 + self.support());
        (t0.floor() as i64 - 1, t1.ceil() as i64 + 1)
    }
}

/// Filter taps for one output row or column, already clipped to the valid source span.
#[derive(Clone, Debug)]
struct Taps {
    first: i32,
    coeffs: Vec<f32>,
}

/// Per-output-position filters over a contiguous target span.
struct FilterBank {
    lo: i32,
    taps: Vec<Option<Taps>>,
}

impl FilterBank {
    /// Build filters for targets in `[lo, hi]` reading sources in `[src_lo, src_hi]`.
    fn build(axis: Axis, lo: i32, hi: i32, src_lo: i32, src_hi: i32) -> MontageResult<Self> {
        let sub = axis.sub();
        let mut taps = Vec::with_capacity((i64::from(hi) - i64::from(lo) + 1).max(0) as usize);
        for t in lo..=hi {
            // Pixel centers sit at +0.5; `u` is the fractional source index.
            let u = axis.to_source(f64::from(t) + 0.5) - 0.5;
            let i = u.floor();
            let fir = FirFilter::new(axis.kernel, sub, u - i)?;
            let first = fir.first_tap(i as i64);

            let start = (i64::from(src_lo) - first).max(0);
            let end = (i64::from(src_hi) - first + 1).min(fir.coeffs().len() as i64);
            if start >= end {
                taps.push(None);
                continue;
            }
            taps.push(Some(Taps {
                first: (first + start) as i32,
                coeffs: fir.coeffs()[start as usize..end as usize].to_vec(),
            }));
        }
        Ok(Self { lo, taps })
    }

    fn get(&self, t: i32) -> Option<&Taps> {
        let idx = usize::try_from(i64::from(t) - i64::from(self.lo)).ok()?;
        self.taps.get(idx)?.as_ref()
    }

    /// First and last target positions that have any taps.
    fn extent(&self) -> Option<(i32, i32)> {
        let first = self.taps.iter().position(Option::is_some)?;
        let last = self.taps.iter().rposition(Option::is_some)?;
        Some((self.lo + first as i32, self.lo + last as i32))
    }
}

/// Source region [`scale_frame`] needs in order to fill `target`.
pub fn source_window_for(params: &ScaleParams, target: Box2i) -> MontageResult<Box2i> {
    params.validate()?;
    if target.is_empty() {
        return Ok(Box2i::empty());
    }
    let (x0, x1) = params.x_axis().source_span(target.min.x, target.max.x);
    let (y0, y1) = params.y_axis().source_span(target.min.y, target.max.y);
    Ok(Box2i::new(
        clamp_i32(x0),
        clamp_i32(y0),
        clamp_i32(x1),
        clamp_i32(y1),
    ))
}

/// Resample the valid region of `src` into `out` with a separable FIR filter.
///
/// A horizontal pass writes a temporary frame spanning the source's valid rows; a vertical pass
/// then fills `out`. Source pixels outside the current window count as transparent. The result
/// window is the footprint of the source window, clipped to `out`'s full window.
#[tracing::instrument(level = "trace", skip(out, src))]
pub fn scale_frame(out: &mut RgbaFrame, src: &RgbaFrame, params: &ScaleParams) -> MontageResult<()> {
    params.validate()?;
    out.clear();

    let src_win = src.current_window();
    let full = out.full_window();
    if src_win.is_empty() || full.is_empty() {
        return Ok(());
    }

    let (xa, ya) = (params.x_axis(), params.y_axis());
    let (tx0, tx1) = xa.target_span(src_win.min.x, src_win.max.x);
    let (ty0, ty1) = ya.target_span(src_win.min.y, src_win.max.y);
    let tx0 = clamp_i32(tx0).max(full.min.x);
    let tx1 = clamp_i32(tx1).min(full.max.x);
    let ty0 = clamp_i32(ty0).max(full.min.y);
    let ty1 = clamp_i32(ty1).min(full.max.y);
    if tx1 < tx0 || ty1 < ty0 {
        return Ok(());
    }

    let cols = FilterBank::build(xa, tx0, tx1, src_win.min.x, src_win.max.x)?;
    let rows = FilterBank::build(ya, ty0, ty1, src_win.min.y, src_win.max.y)?;
    let (Some((x0, x1)), Some((y0, y1))) = (cols.extent(), rows.extent()) else {
        return Ok(());
    };

    // Horizontal pass: target columns x source rows.
    let mut tmp = RgbaFrame::new(Box2i::new(x0, src_win.min.y, x1, src_win.max.y));
    let tmp_stride = tmp.stride();
    tmp.data_mut()
        .par_chunks_mut(tmp_stride)
        .enumerate()
        .for_each(|(ri, row)| {
            let y = src_win.min.y + ri as i32;
            for (ci, px) in row.iter_mut().enumerate() {
                let x = x0 + ci as i32;
                *px = match cols.get(x) {
                    Some(t) => convolve(t, |sx| src.pixel(sx, y)),
                    None => Rgba::TRANSPARENT,
                };
            }
        });
    tmp.set_current_window(tmp.full_window());

    // Vertical pass into the output.
    let out_stride = out.stride();
    out.data_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(ri, row)| {
            let y = full.min.y + ri as i32;
            if y < y0 || y > y1 {
                return;
            }
            let taps = rows.get(y);
            for x in x0..=x1 {
                let px = &mut row[(x - full.min.x) as usize];
                *px = match taps {
                    Some(t) => convolve(t, |sy| tmp.pixel(x, sy)),
                    None => Rgba::TRANSPARENT,
                };
            }
        });
    out.set_current_window(Box2i::new(x0, y0, x1, y1));
    Ok(())
}

fn convolve(taps: &Taps, sample: impl Fn(i32) -> Rgba) -> Rgba {
    taps.coeffs
        .iter()
        .enumerate()
        .fold(Rgba::TRANSPARENT, |acc, (k, &c)| {
            acc + sample(taps.first + k as i32).scale(c)
        })
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/resample/scale.rs"]
mod tests;
