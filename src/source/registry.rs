use crate::foundation::error::{MontageError, MontageResult};
use crate::source::{AudioSource, VideoSource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named lookup of shared sources.
///
/// Video and audio live in separate namespaces; registering a name twice replaces the entry.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    video: BTreeMap<String, Arc<dyn VideoSource>>,
    audio: BTreeMap<String, Arc<dyn AudioSource>>,
}

impl SourceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a video source under `name`.
    pub fn insert_video(&mut self, name: impl Into<String>, source: Arc<dyn VideoSource>) {
        self.video.insert(name.into(), source);
    }

    /// Register an audio source under `name`.
    pub fn insert_audio(&mut self, name: impl Into<String>, source: Arc<dyn AudioSource>) {
        self.audio.insert(name.into(), source);
    }

    /// Look up a video source.
    pub fn video(&self, name: &str) -> MontageResult<Arc<dyn VideoSource>> {
        self.video
            .get(name)
            .cloned()
            .ok_or_else(|| MontageError::not_found(format!("video source '{name}'")))
    }

    /// Look up an audio source.
    pub fn audio(&self, name: &str) -> MontageResult<Arc<dyn AudioSource>> {
        self.audio
            .get(name)
            .cloned()
            .ok_or_else(|| MontageError::not_found(format!("audio source '{name}'")))
    }

    /// Registered video names in sorted order.
    pub fn video_names(&self) -> impl Iterator<Item = &str> {
        self.video.keys().map(String::as_str)
    }

    /// Registered audio names in sorted order.
    pub fn audio_names(&self) -> impl Iterator<Item = &str> {
        self.audio.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("video", &self.video.keys().collect::<Vec<_>>())
            .field("audio", &self.audio.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/registry.rs"]
mod tests;
