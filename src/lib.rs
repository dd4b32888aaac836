//! Montage is a frame-accurate, pull-based audio/video compositing engine.
//!
//! Every producer renders into a caller-supplied buffer and reports the region it actually
//! defined (its *window of validity*); everything outside that window is transparent video or
//! silent audio. On top of that contract the crate provides:
//!
//! - Sources: generators, still images, cross-fades, layering and FIR resampling
//! - [`Workspace`] timelines that composite z-ordered items at any frame
//! - A [`SystemPresentationClock`] with play/seek/speed and change callbacks
//! - Threaded [`VideoPlayer`] / [`AudioPlayer`] pipelines driven by that clock
//! - JSON [`Project`] files that wire all of the above together
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod clock;
pub(crate) mod composite;
pub(crate) mod frame;
pub(crate) mod playback;
pub(crate) mod project;
pub(crate) mod resample;
pub(crate) mod source;
pub(crate) mod workspace;

pub use crate::foundation::core::{Box2i, FrameRate, Point, Rational, Rgba, V2i, Vec2};
pub use crate::foundation::error::{MontageError, MontageResult};

pub use crate::frame::audio::AudioFrame;
pub use crate::frame::convert::{
    frame_from_rgba8, frame_to_rgba8, load_image_frame, save_frame_png,
};
pub use crate::frame::video::RgbaFrame;

pub use crate::animation::ease::Ease;
pub use crate::animation::func::{
    ConstantFunction, FrameFunction, InterpMode, Keyframe, Keyframes, LinearFunction,
};

pub use crate::composite::audio::{apply_gain, mix_add};
pub use crate::composite::video::{cross_fade, cross_fade_frame, over, over_frame};

pub use crate::resample::fir::{FirFilter, ResampleKernel};
pub use crate::resample::scale::{ScaleParams, scale_frame, source_window_for};

pub use crate::source::audio::{GainSource, PcmClipSource, SilenceSource, SineSource};
pub use crate::source::filter::{CrossFadeSource, OverSource, ScaleSource};
pub use crate::source::registry::SourceRegistry;
pub use crate::source::video::{
    CheckerboardSource, EmptyVideoSource, FrameSequenceSource, SolidColorSource,
    StillImageSource,
};
pub use crate::source::{AudioSource, VideoSource};

pub use crate::workspace::{
    AudioWorkspace, ItemId, Placement, VideoWorkspace, Workspace, WorkspaceItem,
};

pub use crate::clock::presentation::{
    CallbackHandle, ClockCallback, ClockEvent, ClockEventKind, ClockSnapshot, PresentationClock,
    SystemPresentationClock,
};
pub use crate::clock::time_base::{ManualTimeBase, MonotonicTimeBase, TimeBase};

pub use crate::playback::audio::AudioPlayer;
pub use crate::playback::sink::{
    AudioSink, InMemoryAudioSink, InMemoryVideoSink, TracingVideoSink, VideoSink,
};
pub use crate::playback::video::VideoPlayer;
pub use crate::playback::{AudioPlaybackOpts, PlaybackStats, VideoPlaybackOpts};

pub use crate::project::build::Project;
pub use crate::project::model::{
    AudioDef, CanvasDef, ItemDef, ProjectDef, SourceDef, WindowDef,
};
