//! Scalar animation sources (frame functions) and easing.

pub(crate) mod ease;
pub(crate) mod func;
