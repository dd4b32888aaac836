//! Premultiplied-alpha compositing math and audio mixing.

pub(crate) mod audio;
pub(crate) mod video;
