use crate::animation::ease::Ease;
use crate::foundation::error::{MontageError, MontageResult};

/// Scalar animation source: a value for any (possibly fractional) frame index.
///
/// Filters sample these per frame, e.g. the mix factor of a cross-fade.
pub trait FrameFunction: Send + Sync {
    /// Value at `frame`.
    fn value_at(&self, frame: f64) -> f64;

    /// Batched evaluation; `out` is filled pairwise with `frames`.
    fn values(&self, frames: &[f64], out: &mut [f64]) {
        for (o, &f) in out.iter_mut().zip(frames) {
            *o = self.value_at(f);
        }
    }
}

/// Same value at every frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConstantFunction(pub f64);

impl FrameFunction for ConstantFunction {
    fn value_at(&self, _frame: f64) -> f64 {
        self.0
    }
}

/// `slope * frame + intercept`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearFunction {
    /// Change per frame.
    pub slope: f64,
    /// Value at frame 0.
    pub intercept: f64,
}

impl FrameFunction for LinearFunction {
    fn value_at(&self, frame: f64) -> f64 {
        self.slope * frame + self.intercept
    }
}

/// Interpolation strategy between keyframes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    /// Keep the left keyframe's value until the next key.
    Hold,
    /// Interpolate (through the left key's easing) toward the next key.
    #[default]
    Linear,
}

/// One keyframe.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Frame index of this key.
    pub frame: f64,
    /// Value at `frame`.
    pub value: f64,
    /// Easing applied toward the next keyframe.
    #[serde(default)]
    pub ease: Ease,
}

/// Piecewise function defined by keyframes sorted by frame.
///
/// Before the first key the first value holds; after the last key the last value holds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes {
    keys: Vec<Keyframe>,
    #[serde(default)]
    mode: InterpMode,
}

impl Keyframes {
    /// Build validated keyframes (non-empty, finite, sorted by frame).
    pub fn new(keys: Vec<Keyframe>, mode: InterpMode) -> MontageResult<Self> {
        let kf = Self { keys, mode };
        kf.validate()?;
        Ok(kf)
    }

    /// Validate ordering and presence of keys.
    pub fn validate(&self) -> MontageResult<()> {
        if self.keys.is_empty() {
            return Err(MontageError::validation(
                "Keyframes must have at least one key",
            ));
        }
        if self
            .keys
            .iter()
            .any(|k| !k.frame.is_finite() || !k.value.is_finite())
        {
            return Err(MontageError::validation("Keyframes must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(MontageError::validation(
                "Keyframes keys must be sorted by frame",
            ));
        }
        Ok(())
    }

    /// Keys in frame order.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Interpolation mode.
    pub fn mode(&self) -> InterpMode {
        self.mode
    }
}

impl FrameFunction for Keyframes {
    fn value_at(&self, frame: f64) -> f64 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let idx = self.keys.partition_point(|k| k.frame <= frame);

        if idx == 0 {
            return first.value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.frame - a.frame;
        if span <= 0.0 {
            return a.value;
        }

        match self.mode {
            InterpMode::Hold => a.value,
            InterpMode::Linear => {
                let t = a.ease.apply((frame - a.frame) / span);
                a.value + (b.value - a.value) * t
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/func.rs"]
mod tests;
