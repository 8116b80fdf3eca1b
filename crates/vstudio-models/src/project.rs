//! Project model.
//!
//! A project carries every production stage in one loosely-typed record:
//! identity, script, voice-over, scene images, rendered video and YouTube
//! publication. Fields of a later stage are only meaningful once the status
//! reflects the prior stage, but nothing here enforces that.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};
use crate::status::ProjectStatus;

/// Treat an explicit JSON `null` like a missing field whose default is
/// `T::default()`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_title() -> String {
    "Untitled Project".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_use_case() -> String {
    "explanation".to_string()
}

fn default_script_style() -> String {
    "educational".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_unit_rate() -> f64 {
    1.0
}

fn default_image_style() -> String {
    "realistic".to_string()
}

fn default_resolution() -> String {
    "1080p".to_string()
}

fn default_fps() -> u32 {
    30
}

fn default_template() -> String {
    "basic_fade".to_string()
}

fn default_music() -> String {
    "none".to_string()
}

fn default_sections() -> u32 {
    1
}

/// Null-tolerant deserializers for fields with a non-zero default: `null`
/// decodes to the same value as an absent key.
macro_rules! null_or_default {
    ($($name:ident: $ty:ty => $default:ident;)*) => {
        $(
            fn $name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
            where
                D: Deserializer<'de>,
            {
                Ok(Option::<$ty>::deserialize(deserializer)?.unwrap_or_else($default))
            }
        )*
    };
}

null_or_default! {
    nullable_title: String => default_title;
    nullable_language: String => default_language;
    nullable_use_case: String => default_use_case;
    nullable_script_style: String => default_script_style;
    nullable_sections: u32 => default_sections;
    nullable_voice: String => default_voice;
    nullable_unit_rate: f64 => default_unit_rate;
    nullable_image_style: String => default_image_style;
    nullable_resolution: String => default_resolution;
    nullable_fps: u32 => default_fps;
    nullable_template: String => default_template;
    nullable_music: String => default_music;
}

/// One scene of the images stage: the prompt and, once generated, its image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneImage {
    #[serde(default, deserialize_with = "nullable")]
    pub prompt: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl SceneImage {
    /// An empty scene waiting for a prompt.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A scene with a prompt and no image yet.
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            url: None,
        }
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// A video project as exchanged with the core API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier; absent on an unsaved draft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // --- identity / details ---
    #[serde(default = "default_title", deserialize_with = "nullable_title")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default = "default_language", deserialize_with = "nullable_language")]
    pub language: String,
    #[serde(default = "default_use_case", deserialize_with = "nullable_use_case")]
    pub use_case: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "nullable")]
    pub keywords: String,
    #[serde(default, deserialize_with = "nullable")]
    pub video_description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub video_inspirations: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,

    // --- script ---
    #[serde(default, deserialize_with = "nullable")]
    pub script_text: String,
    #[serde(default = "default_script_style", deserialize_with = "nullable_script_style")]
    pub script_style: String,
    #[serde(default = "default_sections", deserialize_with = "nullable_sections")]
    pub nb_section: u32,

    // --- audio ---
    #[serde(default = "default_voice", deserialize_with = "nullable_voice")]
    pub voice_id: String,
    #[serde(default = "default_unit_rate", deserialize_with = "nullable_unit_rate")]
    pub audio_speed: f64,
    #[serde(default = "default_unit_rate", deserialize_with = "nullable_unit_rate")]
    pub audio_pitch: f64,
    #[serde(default)]
    pub audio_url: Option<String>,

    // --- images ---
    #[serde(default = "default_image_style", deserialize_with = "nullable_image_style")]
    pub image_style: String,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<SceneImage>,

    // --- video ---
    #[serde(default = "default_resolution", deserialize_with = "nullable_resolution")]
    pub resolution: String,
    #[serde(default = "default_fps", deserialize_with = "nullable_fps")]
    pub fps: u32,
    #[serde(default = "default_template", deserialize_with = "nullable_template")]
    pub video_template_id: String,
    #[serde(default = "default_music", deserialize_with = "nullable_music")]
    pub background_music: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub subtitle_path: Option<String>,
    /// Rendered length in seconds
    #[serde(default, deserialize_with = "nullable")]
    pub duration: f64,

    // --- YouTube publication ---
    #[serde(default)]
    pub youtube_video_id: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub youtube_uploaded_at: Option<String>,
    #[serde(default)]
    pub youtube_scheduled_publish_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub youtube_is_premiere: bool,

    // --- server bookkeeping ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Fields this client does not model, kept so a save does not drop them
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new_draft()
    }
}

impl Project {
    /// A fresh in-memory draft with the editor defaults.
    pub fn new_draft() -> Self {
        Self {
            id: None,
            title: default_title(),
            description: String::new(),
            language: default_language(),
            use_case: default_use_case(),
            status: ProjectStatus::Draft,
            keywords: String::new(),
            video_description: String::new(),
            video_inspirations: Vec::new(),
            tags: Vec::new(),
            script_text: String::new(),
            script_style: default_script_style(),
            nb_section: default_sections(),
            voice_id: default_voice(),
            audio_speed: default_unit_rate(),
            audio_pitch: default_unit_rate(),
            audio_url: None,
            image_style: default_image_style(),
            images: Vec::new(),
            resolution: default_resolution(),
            fps: default_fps(),
            video_template_id: default_template(),
            background_music: default_music(),
            video_url: None,
            thumbnail: None,
            subtitle_path: None,
            duration: 0.0,
            youtube_video_id: None,
            youtube_url: None,
            youtube_uploaded_at: None,
            youtube_scheduled_publish_at: None,
            youtube_is_premiere: false,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Decode a project from server JSON, normalizing legacy field shapes.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        if !value.is_object() {
            return Err(ModelError::InvalidProject(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        let mut project: Project = serde_json::from_value(value)?;
        project.migrate_legacy_fields();
        Ok(project)
    }

    /// Serialize into a JSON object.
    pub fn to_json_map(&self) -> ModelResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ModelError::InvalidProject(format!(
                "project serialized to non-object {}",
                other
            ))),
        }
    }

    /// Fold older payload shapes into the canonical fields.
    ///
    /// - `images_prompts: [string]` becomes `images: [{prompt, url: null}]`
    /// - `audio_path` becomes `audio_url`
    pub fn migrate_legacy_fields(&mut self) {
        if let Some(prompts) = self.extra.remove("images_prompts") {
            if self.images.is_empty() {
                if let Value::Array(items) = prompts {
                    self.images = items
                        .into_iter()
                        .filter_map(|item| item.as_str().map(SceneImage::with_prompt))
                        .collect();
                }
            }
        }

        if let Some(path) = self.extra.remove("audio_path") {
            if self.audio_url.is_none() {
                self.audio_url = path.as_str().map(str::to_string);
            }
        }
    }

    /// Identifier used in stage routes; unsaved drafts use a placeholder.
    pub fn route_id(&self) -> &str {
        self.id.as_deref().unwrap_or(crate::stage::UNSAVED_PROJECT_ID)
    }

    pub fn has_script(&self) -> bool {
        !self.script_text.is_empty()
    }

    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    pub fn has_video(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Rendered and not yet handed to YouTube.
    pub fn is_ready_for_upload(&self) -> bool {
        self.status == ProjectStatus::VideoReady && self.has_video()
    }

    /// Case-insensitive substring match on title or description.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
