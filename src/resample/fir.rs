use crate::foundation::error::{MontageError, MontageResult};
use std::f64::consts::PI;

/// Reconstruction kernel used to build resampling filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResampleKernel {
    /// Tent filter, radius 1 (bilinear when not widened).
    Triangle,
    /// Windowed sinc with `lobes` lobes on each side.
    Lanczos {
        /// Kernel radius in source pixels.
        lobes: u32,
    },
}

impl ResampleKernel {
    /// Support radius in (unwidened) source pixels.
    pub fn radius(self) -> f64 {
        match self {
            Self::Triangle => 1.0,
            Self::Lanczos { lobes } => f64::from(lobes.max(1)),
        }
    }

    /// Kernel weight at distance `x`.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Self::Triangle => (1.0 - x.abs()).max(0.0),
            Self::Lanczos { .. } => {
                let a = self.radius();
                if x.abs() >= a {
                    0.0
                } else {
                    sinc(x) * sinc(x / a)
                }
            }
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let px = PI * x;
    px.sin() / px
}

/// Normalized FIR filter.
///
/// Evaluated at integer position `i` it computes `Σ_k coeffs[k] * input[i + k - center]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FirFilter {
    coeffs: Vec<f32>,
    center: i32,
}

impl FirFilter {
    /// Build a filter that samples the input at `i + offset`.
    ///
    /// `sub` widens the kernel for downsampling (use `1/scale`); values below 1 act as 1.
    /// Taps sit at the integers strictly inside the widened support around `offset`.
    pub fn new(kernel: ResampleKernel, sub: f64, offset: f64) -> MontageResult<Self> {
        if !sub.is_finite() || sub <= 0.0 {
            return Err(MontageError::validation("FIR sub must be finite and > 0"));
        }
        if !offset.is_finite() {
            return Err(MontageError::validation("FIR offset must be finite"));
        }
        let sub = sub.max(1.0);
        let support = kernel.radius() * sub;

        let j_min = (offset - support).floor() as i64 + 1;
        let j_max = (offset + support).ceil() as i64 - 1;

        let weights: Vec<f64> = (j_min..=j_max)
            .map(|j| kernel.eval((j as f64 - offset) / sub))
            .collect();
        let sum: f64 = weights.iter().sum();
        if weights.is_empty() || sum.abs() < 1e-12 {
            return Err(MontageError::validation("FIR filter has zero gain"));
        }

        Ok(Self {
            coeffs: weights.iter().map(|w| (w / sum) as f32).collect(),
            center: (-j_min) as i32,
        })
    }

    /// Tap weights (sum to 1).
    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }

    /// Index of the tap aligned with the evaluation position.
    pub fn center(&self) -> i32 {
        self.center
    }

    /// Input index read by the first tap when evaluating at `i`.
    pub fn first_tap(&self, i: i64) -> i64 {
        i - i64::from(self.center)
    }

    /// Evaluate over a slice, treating out-of-range inputs as zero.
    pub fn apply(&self, input: &[f32], i: i64) -> f32 {
        let first = self.first_tap(i);
        self.coeffs
            .iter()
            .enumerate()
            .filter_map(|(k, &c)| {
                let idx = usize::try_from(first + k as i64).ok()?;
                input.get(idx).map(|&v| v * c)
            })
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/fir.rs"]
mod tests;
