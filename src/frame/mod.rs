//! Frame buffers that carry a window of validity.
//!
//! Every pull in the source graph hands the producer a pre-sized buffer (the *full* window or
//! sample range) and reads back the sub-region the producer actually defined (the *current*
//! window). Anything outside the current window is transparent video or silent audio.

pub(crate) mod audio;
pub(crate) mod convert;
pub(crate) mod pool;
pub(crate) mod video;
