use crate::animation::func::FrameFunction;
use crate::foundation::core::{Box2i, FrameRate};
use crate::foundation::error::{MontageError, MontageResult};
use crate::project::model::{ProjectDef, SourceDef, color_from_def};
use crate::resample::scale::ScaleParams;
use crate::source::audio::{GainSource, SilenceSource, SineSource};
use crate::source::filter::{CrossFadeSource, OverSource, ScaleSource};
use crate::source::registry::SourceRegistry;
use crate::source::video::{CheckerboardSource, SolidColorSource, StillImageSource};
use crate::source::{AudioSource, VideoSource};
use crate::workspace::{AudioWorkspace, VideoWorkspace};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded project: resolved sources plus the video and audio timelines.
#[derive(Debug)]
pub struct Project {
    def: ProjectDef,
    root: PathBuf,
    registry: SourceRegistry,
    video: Arc<VideoWorkspace>,
    audio: Arc<AudioWorkspace>,
}

impl Project {
    /// Read and build a project file; relative paths resolve against its directory.
    #[tracing::instrument]
    pub fn load(path: &Path) -> MontageResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MontageError::Other(anyhow::anyhow!(
                "failed to read project '{}': {e}",
                path.display()
            ))
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_json_str(&text, &root)
    }

    /// Parse and build project JSON.
    pub fn from_json_str(json: &str, root: &Path) -> MontageResult<Self> {
        let def: ProjectDef = serde_json::from_str(json)
            .map_err(|e| MontageError::serde(format!("invalid project JSON: {e}")))?;
        Self::from_def(def, root)
    }

    /// Validate `def` and build its sources and timelines.
    pub fn from_def(def: ProjectDef, root: &Path) -> MontageResult<Self> {
        def.validate()?;

        let mut resolver = Resolver {
            def: &def,
            root,
            registry: SourceRegistry::new(),
            visiting: BTreeSet::new(),
        };
        for name in def.sources.keys() {
            resolver.resolve(name)?;
        }
        let registry = resolver.registry;

        let video = Arc::new(VideoWorkspace::new());
        for item in &def.video {
            let id = video.add_item(registry.video(&item.source)?, item.placement)?;
            video.set_tag(id, item.tag.clone())?;
        }
        let audio = Arc::new(AudioWorkspace::new(def.audio.channels)?);
        for item in &def.audio_items {
            let id = audio.add_item(registry.audio(&item.source)?, item.placement)?;
            audio.set_tag(id, item.tag.clone())?;
        }

        tracing::debug!(
            sources = def.sources.len(),
            video_items = def.video.len(),
            audio_items = def.audio_items.len(),
            "project built"
        );
        Ok(Self {
            def,
            root: root.to_path_buf(),
            registry,
            video,
            audio,
        })
    }

    /// Parsed definition.
    pub fn def(&self) -> &ProjectDef {
        &self.def
    }

    /// Directory relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canvas window.
    pub fn canvas(&self) -> Box2i {
        self.def.canvas.window()
    }

    /// Video frame rate.
    pub fn frame_rate(&self) -> FrameRate {
        self.def.frame_rate
    }

    /// Audio sample rate.
    pub fn sample_rate(&self) -> MontageResult<FrameRate> {
        FrameRate::from_hz(self.def.audio.sample_rate)
    }

    /// Audio channel count.
    pub fn channels(&self) -> usize {
        self.def.audio.channels
    }

    /// Resolved sources.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Video timeline.
    pub fn video(&self) -> &Arc<VideoWorkspace> {
        &self.video
    }

    /// Audio timeline.
    pub fn audio(&self) -> &Arc<AudioWorkspace> {
        &self.audio
    }
}

enum Built {
    Video(Arc<dyn VideoSource>),
    Audio(Arc<dyn AudioSource>),
}

struct Resolver<'a> {
    def: &'a ProjectDef,
    root: &'a Path,
    registry: SourceRegistry,
    visiting: BTreeSet<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, name: &str) -> MontageResult<Built> {
        if let Ok(v) = self.registry.video(name) {
            return Ok(Built::Video(v));
        }
        if let Ok(a) = self.registry.audio(name) {
            return Ok(Built::Audio(a));
        }
        let project = self.def;
        let def = project
            .sources
            .get(name)
            .ok_or_else(|| MontageError::not_found(format!("source '{name}'")))?;
        if !self.visiting.insert(name.to_string()) {
            return Err(MontageError::validation(format!(
                "source '{name}' depends on itself"
            )));
        }
        let built = self.build(name, def)?;
        self.visiting.remove(name);

        match &built {
            Built::Video(v) => self.registry.insert_video(name, Arc::clone(v)),
            Built::Audio(a) => self.registry.insert_audio(name, Arc::clone(a)),
        }
        Ok(built)
    }

    fn video(&mut self, name: &str) -> MontageResult<Arc<dyn VideoSource>> {
        match self.resolve(name)? {
            Built::Video(v) => Ok(v),
            Built::Audio(_) => Err(MontageError::validation(format!(
                "source '{name}' is audio where video is required"
            ))),
        }
    }

    fn audio(&mut self, name: &str) -> MontageResult<Arc<dyn AudioSource>> {
        match self.resolve(name)? {
            Built::Audio(a) => Ok(a),
            Built::Video(_) => Err(MontageError::validation(format!(
                "source '{name}' is video where audio is required"
            ))),
        }
    }

    fn build(&mut self, name: &str, def: &SourceDef) -> MontageResult<Built> {
        let audio = self.def.audio;
        Ok(match def {
            SourceDef::Solid { color, window } => {
                let color = color_from_def(*color)?;
                Built::Video(Arc::new(match window {
                    Some(w) => SolidColorSource::with_window(color, w.to_box()),
                    None => SolidColorSource::new(color),
                }))
            }
            SourceDef::Checkerboard { colors, cell_size } => {
                let colors = [color_from_def(colors[0])?, color_from_def(colors[1])?];
                Built::Video(Arc::new(CheckerboardSource::new(colors, *cell_size)?))
            }
            SourceDef::Image { path } => {
                let full = self.root.join(path);
                tracing::debug!(source = name, path = %full.display(), "loading image");
                Built::Video(Arc::new(StillImageSource::from_path(&full)?))
            }
            SourceDef::Sine {
                frequency,
                amplitude,
            } => Built::Audio(Arc::new(SineSource::new(
                *frequency,
                *amplitude,
                audio.sample_rate,
                audio.channels,
            )?)),
            SourceDef::Silence => Built::Audio(Arc::new(SilenceSource::new(audio.channels)?)),
            SourceDef::CrossFade { a, b, mix } => {
                let a = self.video(a)?;
                let b = self.video(b)?;
                let mix: Arc<dyn FrameFunction> = Arc::new(mix.clone());
                Built::Video(Arc::new(CrossFadeSource::new(a, b, mix)))
            }
            SourceDef::Over {
                base,
                overlay,
                opacity,
            } => {
                let base = self.video(base)?;
                let overlay = self.video(overlay)?;
                let opacity: Arc<dyn FrameFunction> = Arc::new(opacity.clone());
                Built::Video(Arc::new(OverSource::new(base, overlay, opacity)))
            }
            SourceDef::Scale {
                source,
                factor_x,
                factor_y,
                source_point,
                target_point,
                kernel,
            } => {
                let input = self.video(source)?;
                let params = ScaleParams {
                    factor_x: *factor_x,
                    factor_y: *factor_y,
                    source_point: *source_point,
                    target_point: *target_point,
                    kernel: *kernel,
                };
                Built::Video(Arc::new(ScaleSource::new(input, params)?))
            }
            SourceDef::Gain { source, gain } => {
                let input = self.audio(source)?;
                Built::Audio(Arc::new(GainSource::new(input, *gain)?))
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/build.rs"]
mod tests;
