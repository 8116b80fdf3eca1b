//! Production stages and their generation payloads.
//!
//! Each stage endpoint receives the slice of the draft it needs. The
//! builders below are the single canonical contract for those payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::project::{Project, SceneImage};
use crate::status::ProjectStatus;

/// Route id used when generating for a project that was never saved.
pub const UNSAVED_PROJECT_ID: &str = "temp";

/// A production step with its own generate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Script,
    Audio,
    Images,
    Video,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Script, Stage::Audio, Stage::Images, Stage::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Script => "script",
            Stage::Audio => "audio",
            Stage::Images => "images",
            Stage::Video => "video",
        }
    }

    /// Status a project reaches once this stage completes.
    pub fn completed_status(&self) -> ProjectStatus {
        match self {
            Stage::Script => ProjectStatus::ScriptGenerated,
            Stage::Audio => ProjectStatus::AudioGenerated,
            Stage::Images => ProjectStatus::ImagesReady,
            Stage::Video => ProjectStatus::VideoReady,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "script" => Ok(Stage::Script),
            "audio" => Ok(Stage::Audio),
            "images" => Ok(Stage::Images),
            "video" => Ok(Stage::Video),
            other => Err(format!("unknown stage: {}", other)),
        }
    }
}

/// Script generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub title: String,
    pub description: String,
    pub use_case: String,
    pub language: String,
    pub style: String,
    pub nb_section: u32,
    pub keywords: String,
    pub video_inspirations: Vec<String>,
}

impl ScriptRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            use_case: project.use_case.clone(),
            language: project.language.clone(),
            style: project.script_style.clone(),
            nb_section: project.nb_section,
            keywords: project.keywords.clone(),
            video_inspirations: project.video_inspirations.clone(),
        }
    }
}

/// Text-to-speech request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRequest {
    pub script_text: String,
    pub voice_id: String,
    pub audio_speed: f64,
    pub audio_pitch: f64,
    pub language: String,
}

impl AudioRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            script_text: project.script_text.clone(),
            voice_id: project.voice_id.clone(),
            audio_speed: project.audio_speed,
            audio_pitch: project.audio_pitch,
            language: project.language.clone(),
        }
    }
}

/// Batch image synthesis request for every scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesRequest {
    pub images: Vec<SceneImage>,
    pub style: String,
}

impl ImagesRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            images: project.images.clone(),
            style: project.image_style.clone(),
        }
    }
}

/// Single-scene image request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneImageRequest {
    pub prompt: String,
    pub style: String,
}

impl SceneImageRequest {
    /// Payload for scene `index`, or `None` if the scene does not exist.
    pub fn from_project(project: &Project, index: usize) -> Option<Self> {
        project.images.get(index).map(|scene| Self {
            prompt: scene.prompt.clone(),
            style: project.image_style.clone(),
        })
    }
}

/// Single-scene image response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneImageResponse {
    #[serde(alias = "url")]
    pub image_url: Option<String>,
}

/// Video render request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub resolution: String,
    pub fps: u32,
    pub template: String,
    pub background_music: String,
}

impl VideoRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            resolution: project.resolution.clone(),
            fps: project.fps,
            template: project.video_template_id.clone(),
            background_music: project.background_music.clone(),
        }
    }
}

/// YouTube description generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionRequest {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub language: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub script_text: String,
}

impl DescriptionRequest {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            keywords: project.keywords.clone(),
            language: project.language.clone(),
            script_text: project.script_text.clone(),
        }
    }
}

/// Generated description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionResponse {
    #[serde(alias = "video_description")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_parse_and_status() {
        assert_eq!("Script".parse::<Stage>().unwrap(), Stage::Script);
        assert!("subtitles".parse::<Stage>().is_err());
        assert_eq!(Stage::Audio.completed_status(), ProjectStatus::AudioGenerated);
        assert_eq!(Stage::Images.completed_status(), ProjectStatus::ImagesReady);
    }

    #[test]
    fn test_script_request_uses_script_style() {
        let mut project = Project::new_draft();
        project.script_style = "comedic".into();
        project.video_inspirations = vec!["https://youtu.be/x".into()];

        let value = serde_json::to_value(ScriptRequest::from_project(&project)).unwrap();
        assert_eq!(value["style"], json!("comedic"));
        assert_eq!(value["nb_section"], json!(1));
        assert_eq!(value["video_inspirations"], json!(["https://youtu.be/x"]));
    }

    #[test]
    fn test_video_request_maps_template_field() {
        let project = Project::new_draft();
        let value = serde_json::to_value(VideoRequest::from_project(&project)).unwrap();
        assert_eq!(value["template"], json!("basic_fade"));
        assert_eq!(value["fps"], json!(30));
    }

    #[test]
    fn test_scene_request_out_of_range() {
        let project = Project::new_draft();
        assert!(SceneImageRequest::from_project(&project, 0).is_none());
    }

    #[test]
    fn test_description_response_alias() {
        let resp: DescriptionResponse =
            serde_json::from_value(json!({"video_description": "hello"})).unwrap();
        assert_eq!(resp.description, "hello");
    }
}
