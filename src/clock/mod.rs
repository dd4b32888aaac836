//! Presentation clock: maps a system time base to presentation time under play/seek/speed.
//!
//! Outputs never own the notion of "now"; they read it from a [`PresentationClock`] and react to
//! its change notifications, which keeps independent audio and video outputs in step.

pub(crate) mod presentation;
pub(crate) mod time_base;
