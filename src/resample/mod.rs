//! Separable FIR resampling of windowed frames.

pub(crate) mod fir;
pub(crate) mod scale;
