//! Shared data models for the video studio client.
//!
//! This crate provides Serde-serializable types for:
//! - Projects and their production status
//! - Stage generation payloads (script, audio, images, video)
//! - YouTube proxy request/response schemas
//! - Option catalogs used by editor forms
//! - Date and duration formatting helpers

pub mod catalog;
pub mod error;
pub mod format;
pub mod project;
pub mod stage;
pub mod status;
pub mod youtube;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use project::{Project, SceneImage};
pub use stage::{
    AudioRequest, DescriptionRequest, DescriptionResponse, ImagesRequest, SceneImageRequest,
    SceneImageResponse, ScriptRequest, Stage, VideoRequest,
};
pub use status::ProjectStatus;
pub use youtube::{
    AuthStatus, AuthUrlResponse, ChannelInfo, MetadataUpdate, PrivacyStatus, ScheduleRequest,
    ScheduleResponse, ThumbnailUpdate, UploadInfo, UploadResponse,
};
