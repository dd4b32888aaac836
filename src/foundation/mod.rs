//! Shared value types: rationals and rates, pixel boxes, colors, errors.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
