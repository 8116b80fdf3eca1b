//! The editor's in-memory project draft and its update actions.
//!
//! Every edit a tab makes and every stage result the server returns is a
//! [`DraftUpdate`]. [`Draft::apply`] is the only place the draft changes,
//! so a rejected update always leaves the previous draft in place.

use serde_json::{Map, Value};
use thiserror::Error;
use vstudio_models::catalog::AUDIO_RATE_RANGE;
use vstudio_models::{ModelError, Project, ProjectStatus, SceneImage, Stage};

/// Reasons an update is rejected.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Scene {index} does not exist ({len} scenes)")]
    SceneOutOfRange { index: usize, len: usize },

    #[error("Inspiration {index} does not exist ({len} entries)")]
    InspirationOutOfRange { index: usize, len: usize },

    #[error("Patch cannot be applied: {0}")]
    InvalidPatch(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Edits from the details form.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsChange {
    Title(String),
    Description(String),
    Language(String),
    UseCase(String),
    Keywords(String),
    Sections(u32),
    AddInspiration,
    SetInspiration { index: usize, url: String },
    RemoveInspiration(usize),
}

/// Edits from the script tab.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptChange {
    Style(String),
    Text(String),
}

/// Edits from the audio tab.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioChange {
    Voice(String),
    Speed(f64),
    Pitch(f64),
}

/// Edits from the images tab.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagesChange {
    Style(String),
    AddScene,
    ScenePrompt { index: usize, prompt: String },
    RemoveScene(usize),
}

/// Edits from the video tab.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoChange {
    Resolution(String),
    Fps(u32),
    Template(String),
    BackgroundMusic(String),
}

/// One change to the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    // ── Form edits ───────────────────────────────────────────────────────────
    Details(DetailsChange),
    Script(ScriptChange),
    Audio(AudioChange),
    Images(ImagesChange),
    Video(VideoChange),

    // ── Server results ───────────────────────────────────────────────────────
    ScriptGenerated { script_text: String },
    AudioGenerated { audio_url: Option<String> },
    ImagesGenerated { images: Vec<SceneImage> },
    /// Only the scene's URL changes; status is left alone.
    SceneImageGenerated { index: usize, url: Option<String> },
    VideoRendered {
        video_url: Option<String>,
        duration: f64,
        thumbnail: Option<String>,
    },
    DescriptionGenerated(String),

    // ── Whole-record ─────────────────────────────────────────────────────────
    /// Swap in the server's canonical copy after a save or load.
    Replace(Project),
    /// Shallow merge of raw fields.
    Patch(Map<String, Value>),
}

impl DraftUpdate {
    /// The update that merges a stage response's fields.
    pub fn from_stage_result(stage: Stage, response: Project) -> Self {
        match stage {
            Stage::Script => DraftUpdate::ScriptGenerated {
                script_text: response.script_text,
            },
            Stage::Audio => DraftUpdate::AudioGenerated {
                audio_url: response.audio_url,
            },
            Stage::Images => DraftUpdate::ImagesGenerated {
                images: response.images,
            },
            Stage::Video => DraftUpdate::VideoRendered {
                video_url: response.video_url,
                duration: response.duration,
                thumbnail: response.thumbnail,
            },
        }
    }
}

fn clamp_rate(value: f64) -> f64 {
    let (min, max) = AUDIO_RATE_RANGE;
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(min, max)
}

/// A project being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    project: Project,
    dirty: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new(Project::new_draft())
    }
}

impl Draft {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            dirty: false,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    /// Local edits not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Apply one update. On error the draft is unchanged.
    pub fn apply(&mut self, update: DraftUpdate) -> Result<(), DraftError> {
        let p = &mut self.project;
        match update {
            DraftUpdate::Details(change) => match change {
                DetailsChange::Title(v) => p.title = v,
                DetailsChange::Description(v) => p.description = v,
                DetailsChange::Language(v) => p.language = v,
                DetailsChange::UseCase(v) => p.use_case = v,
                DetailsChange::Keywords(v) => p.keywords = v,
                DetailsChange::Sections(n) => p.nb_section = n.max(1),
                DetailsChange::AddInspiration => p.video_inspirations.push(String::new()),
                DetailsChange::SetInspiration { index, url } => {
                    let len = p.video_inspirations.len();
                    let slot = p
                        .video_inspirations
                        .get_mut(index)
                        .ok_or(DraftError::InspirationOutOfRange { index, len })?;
                    *slot = url;
                }
                DetailsChange::RemoveInspiration(index) => {
                    let len = p.video_inspirations.len();
                    if index >= len {
                        return Err(DraftError::InspirationOutOfRange { index, len });
                    }
                    p.video_inspirations.remove(index);
                }
            },

            DraftUpdate::Script(change) => match change {
                ScriptChange::Style(v) => p.script_style = v,
                ScriptChange::Text(v) => p.script_text = v,
            },

            DraftUpdate::Audio(change) => match change {
                AudioChange::Voice(v) => p.voice_id = v,
                AudioChange::Speed(v) => p.audio_speed = clamp_rate(v),
                AudioChange::Pitch(v) => p.audio_pitch = clamp_rate(v),
            },

            DraftUpdate::Images(change) => match change {
                ImagesChange::Style(v) => p.image_style = v,
                ImagesChange::AddScene => p.images.push(SceneImage::empty()),
                ImagesChange::ScenePrompt { index, prompt } => {
                    let len = p.images.len();
                    let scene = p
                        .images
                        .get_mut(index)
                        .ok_or(DraftError::SceneOutOfRange { index, len })?;
                    scene.prompt = prompt;
                }
                ImagesChange::RemoveScene(index) => {
                    let len = p.images.len();
                    if index >= len {
                        return Err(DraftError::SceneOutOfRange { index, len });
                    }
                    p.images.remove(index);
                }
            },

            DraftUpdate::Video(change) => match change {
                VideoChange::Resolution(v) => p.resolution = v,
                VideoChange::Fps(v) => p.fps = v,
                VideoChange::Template(v) => p.video_template_id = v,
                VideoChange::BackgroundMusic(v) => p.background_music = v,
            },

            DraftUpdate::ScriptGenerated { script_text } => {
                p.script_text = script_text;
                p.status = ProjectStatus::ScriptGenerated;
            }
            DraftUpdate::AudioGenerated { audio_url } => {
                p.audio_url = audio_url;
                p.status = ProjectStatus::AudioGenerated;
            }
            DraftUpdate::ImagesGenerated { images } => {
                p.images = images;
                p.status = ProjectStatus::ImagesReady;
            }
            DraftUpdate::SceneImageGenerated { index, url } => {
                let len = p.images.len();
                let scene = p
                    .images
                    .get_mut(index)
                    .ok_or(DraftError::SceneOutOfRange { index, len })?;
                scene.url = url;
            }
            DraftUpdate::VideoRendered {
                video_url,
                duration,
                thumbnail,
            } => {
                p.video_url = video_url;
                p.duration = duration;
                p.thumbnail = thumbnail;
                p.status = ProjectStatus::VideoReady;
            }
            DraftUpdate::DescriptionGenerated(text) => p.video_description = text,

            DraftUpdate::Replace(project) => {
                self.project = project;
                self.dirty = false;
                return Ok(());
            }
            DraftUpdate::Patch(partial) => return self.apply_change(partial),
        }

        self.dirty = true;
        Ok(())
    }

    /// Shallow-merge raw fields into the draft.
    ///
    /// Matching keys are replaced, all others kept. A partial whose values
    /// cannot form a project is rejected whole.
    pub fn apply_change(&mut self, partial: Map<String, Value>) -> Result<(), DraftError> {
        let mut merged = self.project.to_json_map()?;
        for (key, value) in partial {
            merged.insert(key, value);
        }

        let project = Project::from_value(Value::Object(merged))
            .map_err(|e| DraftError::InvalidPatch(e.to_string()))?;
        self.project = project;
        self.dirty = true;
        Ok(())
    }
}
