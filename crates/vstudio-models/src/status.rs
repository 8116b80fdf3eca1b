//! Project production status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Production status of a project.
///
/// Values progress roughly draft → script → audio → images → video →
/// publication, but transitions are driven by server responses and are never
/// validated here. Statuses this client does not know are kept verbatim in
/// [`ProjectStatus::Other`] so they survive a save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    Draft,
    ScriptGenerated,
    AudioGenerated,
    AudioReady,
    ImagesReady,
    VideoReady,
    ScheduledForPublish,
    UploadedToYoutube,
    Other(String),
}

impl ProjectStatus {
    /// All statuses known to this client, in production order.
    pub const KNOWN: [ProjectStatus; 8] = [
        ProjectStatus::Draft,
        ProjectStatus::ScriptGenerated,
        ProjectStatus::AudioGenerated,
        ProjectStatus::AudioReady,
        ProjectStatus::ImagesReady,
        ProjectStatus::VideoReady,
        ProjectStatus::ScheduledForPublish,
        ProjectStatus::UploadedToYoutube,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::ScriptGenerated => "script_generated",
            ProjectStatus::AudioGenerated => "audio_generated",
            ProjectStatus::AudioReady => "audio_ready",
            ProjectStatus::ImagesReady => "images_ready",
            ProjectStatus::VideoReady => "video_ready",
            ProjectStatus::ScheduledForPublish => "scheduled_for_publish",
            ProjectStatus::UploadedToYoutube => "uploaded_to_youtube",
            ProjectStatus::Other(raw) => raw,
        }
    }

    /// Badge label. Unknown statuses render with the draft label.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Draft | ProjectStatus::Other(_) => "Draft",
            ProjectStatus::ScriptGenerated => "Script Generated",
            ProjectStatus::AudioGenerated => "Audio Generated",
            ProjectStatus::AudioReady => "Audio Ready",
            ProjectStatus::ImagesReady => "Images Ready",
            ProjectStatus::VideoReady => "Video Ready",
            ProjectStatus::ScheduledForPublish => "Scheduled for Publish",
            ProjectStatus::UploadedToYoutube => "Uploaded to YouTube",
        }
    }

    /// True once the project has reached YouTube (scheduled or live).
    pub fn is_published(&self) -> bool {
        matches!(
            self,
            ProjectStatus::ScheduledForPublish | ProjectStatus::UploadedToYoutube
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "draft" => ProjectStatus::Draft,
            "script_generated" => ProjectStatus::ScriptGenerated,
            "audio_generated" => ProjectStatus::AudioGenerated,
            "audio_ready" => ProjectStatus::AudioReady,
            "images_ready" => ProjectStatus::ImagesReady,
            "video_ready" => ProjectStatus::VideoReady,
            "scheduled_for_publish" => ProjectStatus::ScheduledForPublish,
            "uploaded_to_youtube" => ProjectStatus::UploadedToYoutube,
            other => ProjectStatus::Other(other.to_string()),
        })
    }
}

impl From<&str> for ProjectStatus {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(ProjectStatus::from)
            .unwrap_or_default())
    }
}
