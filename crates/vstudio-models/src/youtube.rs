//! YouTube proxy request/response schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{ModelError, ModelResult};
use crate::project::{nullable, Project};

/// Channel statistic sent as a number, a numeric string, or `null` when the
/// channel hides it. Anything unreadable counts as 0.
fn statistic<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Integer(u64),
        Float(f64),
        Text(String),
        #[allow(dead_code)]
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Integer(n)) => n,
        Some(Raw::Float(f)) if f.is_finite() && f >= 0.0 => f as u64,
        Some(Raw::Text(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// OAuth authorization URL issued by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Connection status of the YouTube account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub channel_id: Option<String>,
}

/// Connected channel summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default, deserialize_with = "statistic")]
    pub subscriber_count: u64,
    #[serde(default, deserialize_with = "statistic")]
    pub video_count: u64,
    #[serde(default, deserialize_with = "statistic")]
    pub view_count: u64,
}

/// YouTube visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyStatus {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyStatus::Public => "public",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Private => "private",
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PrivacyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(PrivacyStatus::Public),
            "unlisted" => Ok(PrivacyStatus::Unlisted),
            "private" => Ok(PrivacyStatus::Private),
            other => Err(format!("unknown privacy status: {}", other)),
        }
    }
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub youtube_video_id: String,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Scheduling parameters for an uploaded (private) video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Publication time, `YYYY-MM-DDTHH:MM` or RFC 3339
    pub publish_at: String,
    pub is_premiere: bool,
    pub final_privacy_status: PrivacyStatus,
}

/// Result of scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub youtube_video_id: Option<String>,
    #[serde(default)]
    pub scheduled_publish_at: Option<String>,
    #[serde(default)]
    pub is_premiere: bool,
}

/// Metadata patch for an uploaded video.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct MetadataUpdate {
    #[validate(length(max = 100, message = "Title must be 100 characters or fewer"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description must be 5000 characters or fewer"))]
    pub description: String,
    pub tags: Vec<String>,
}

impl MetadataUpdate {
    /// Build from raw form input: fields trimmed, tags comma-separated.
    pub fn from_form(title: &str, description: &str, tags: &str) -> ModelResult<Self> {
        let update = Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            tags: split_tags(tags),
        };
        if update.title.is_empty() {
            return Err(ModelError::Validation("Title is required".to_string()));
        }
        update.validate()?;
        Ok(update)
    }
}

/// Split a comma-separated tag field, dropping empty entries.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Thumbnail replacement by explicit path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailUpdate {
    pub thumbnail_path: String,
}

/// What the upload status display shows for a published project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadInfo {
    pub youtube_video_id: String,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub scheduled_publish_at: Option<String>,
    #[serde(default)]
    pub is_premiere: bool,
}

impl UploadInfo {
    /// Upload info recorded on a project, if it was uploaded already.
    pub fn from_project(project: &Project) -> Option<Self> {
        let video_id = project.youtube_video_id.as_deref().filter(|id| !id.is_empty())?;
        Some(Self {
            youtube_video_id: video_id.to_string(),
            youtube_url: project.youtube_url.clone(),
            uploaded_at: project.youtube_uploaded_at.clone(),
            scheduled_publish_at: project.youtube_scheduled_publish_at.clone(),
            is_premiere: project.youtube_is_premiere,
        })
    }

    pub fn from_upload(response: &UploadResponse) -> Self {
        Self {
            youtube_video_id: response.youtube_video_id.clone(),
            youtube_url: response.youtube_url.clone(),
            uploaded_at: response.uploaded_at.clone(),
            scheduled_publish_at: None,
            is_premiere: false,
        }
    }

    /// Fold a schedule response into this upload.
    pub fn with_schedule(mut self, response: &ScheduleResponse) -> Self {
        if let Some(id) = response.youtube_video_id.as_deref().filter(|id| !id.is_empty()) {
            self.youtube_video_id = id.to_string();
        }
        self.scheduled_publish_at = response.scheduled_publish_at.clone();
        self.is_premiere = response.is_premiere;
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_publish_at.is_some()
    }
}
