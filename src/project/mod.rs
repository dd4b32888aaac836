//! JSON project files: a canvas, rates, a named source table and timeline items.

pub(crate) mod build;
pub(crate) mod model;
