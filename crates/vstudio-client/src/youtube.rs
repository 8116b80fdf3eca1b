//! YouTube proxy API client.
//!
//! The proxy owns the OAuth exchange and the actual YouTube Data API calls;
//! this side only reads the connection flag, follows the authorization URL
//! and triggers uploads, scheduling, metadata and thumbnail updates.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use vstudio_models::{
    AuthStatus, AuthUrlResponse, ChannelInfo, MetadataUpdate, PrivacyStatus, ScheduleRequest,
    ScheduleResponse, ThumbnailUpdate, UploadResponse,
};

use crate::config::StudioConfig;
use crate::error::StudioResult;
use crate::transport::{segment, RequestInterceptor, RestClient};

/// Path prefix of the YouTube proxy.
pub const YOUTUBE_PREFIX: &str = "/api/youtube";

/// Operations of the YouTube proxy.
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    async fn auth_url(&self) -> StudioResult<AuthUrlResponse>;

    async fn auth_status(&self) -> StudioResult<AuthStatus>;

    async fn disconnect(&self) -> StudioResult<()>;

    async fn channel_info(&self) -> StudioResult<ChannelInfo>;

    /// Upload a project's rendered video with the given visibility.
    async fn upload_video(
        &self,
        project_id: &str,
        privacy: PrivacyStatus,
    ) -> StudioResult<UploadResponse>;

    /// Schedule publication of an already uploaded video.
    async fn schedule_video(
        &self,
        project_id: &str,
        request: &ScheduleRequest,
    ) -> StudioResult<ScheduleResponse>;

    async fn update_metadata(&self, video_id: &str, update: &MetadataUpdate) -> StudioResult<Value>;

    async fn video_info(&self, video_id: &str) -> StudioResult<Value>;

    async fn update_thumbnail(&self, video_id: &str, thumbnail_path: &str) -> StudioResult<Value>;

    /// Push the project's stored thumbnail to its uploaded video.
    async fn update_thumbnail_by_project(&self, project_id: &str) -> StudioResult<Value>;

    async fn thumbnail_info(&self, video_id: &str) -> StudioResult<Value>;
}

#[async_trait]
impl<T: YouTubeApi + ?Sized> YouTubeApi for Arc<T> {
    async fn auth_url(&self) -> StudioResult<AuthUrlResponse> {
        (**self).auth_url().await
    }

    async fn auth_status(&self) -> StudioResult<AuthStatus> {
        (**self).auth_status().await
    }

    async fn disconnect(&self) -> StudioResult<()> {
        (**self).disconnect().await
    }

    async fn channel_info(&self) -> StudioResult<ChannelInfo> {
        (**self).channel_info().await
    }

    async fn upload_video(
        &self,
        project_id: &str,
        privacy: PrivacyStatus,
    ) -> StudioResult<UploadResponse> {
        (**self).upload_video(project_id, privacy).await
    }

    async fn schedule_video(
        &self,
        project_id: &str,
        request: &ScheduleRequest,
    ) -> StudioResult<ScheduleResponse> {
        (**self).schedule_video(project_id, request).await
    }

    async fn update_metadata(&self, video_id: &str, update: &MetadataUpdate) -> StudioResult<Value> {
        (**self).update_metadata(video_id, update).await
    }

    async fn video_info(&self, video_id: &str) -> StudioResult<Value> {
        (**self).video_info(video_id).await
    }

    async fn update_thumbnail(&self, video_id: &str, thumbnail_path: &str) -> StudioResult<Value> {
        (**self).update_thumbnail(video_id, thumbnail_path).await
    }

    async fn update_thumbnail_by_project(&self, project_id: &str) -> StudioResult<Value> {
        (**self).update_thumbnail_by_project(project_id).await
    }

    async fn thumbnail_info(&self, video_id: &str) -> StudioResult<Value> {
        (**self).thumbnail_info(video_id).await
    }
}

/// HTTP client for the YouTube proxy.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    rest: RestClient,
}

impl YouTubeClient {
    pub fn new(config: &StudioConfig) -> StudioResult<Self> {
        let rest = RestClient::new(
            format!("{}{}", config.youtube_api_base_url, YOUTUBE_PREFIX),
            config,
        )?;
        Ok(Self { rest })
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.rest = self.rest.with_interceptor(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }
}

#[async_trait]
impl YouTubeApi for YouTubeClient {
    async fn auth_url(&self) -> StudioResult<AuthUrlResponse> {
        self.rest.get("youtube_auth_url", "/auth/url").await
    }

    async fn auth_status(&self) -> StudioResult<AuthStatus> {
        self.rest.get("youtube_auth_status", "/auth/status").await
    }

    async fn disconnect(&self) -> StudioResult<()> {
        let _: Value = self
            .rest
            .post_empty("youtube_disconnect", "/auth/disconnect", &[])
            .await?;
        Ok(())
    }

    async fn channel_info(&self) -> StudioResult<ChannelInfo> {
        self.rest.get("youtube_channel_info", "/channel/info").await
    }

    async fn upload_video(
        &self,
        project_id: &str,
        privacy: PrivacyStatus,
    ) -> StudioResult<UploadResponse> {
        let path = format!("/videos/upload/{}", segment(project_id));
        self.rest
            .post_empty("youtube_upload", &path, &[("privacy_status", privacy.as_str())])
            .await
    }

    async fn schedule_video(
        &self,
        project_id: &str,
        request: &ScheduleRequest,
    ) -> StudioResult<ScheduleResponse> {
        let path = format!("/videos/schedule/{}", segment(project_id));
        self.rest.post("youtube_schedule", &path, request).await
    }

    async fn update_metadata(&self, video_id: &str, update: &MetadataUpdate) -> StudioResult<Value> {
        let path = format!("/videos/{}", segment(video_id));
        self.rest.patch("youtube_update_metadata", &path, update).await
    }

    async fn video_info(&self, video_id: &str) -> StudioResult<Value> {
        let path = format!("/videos/{}", segment(video_id));
        self.rest.get("youtube_video_info", &path).await
    }

    async fn update_thumbnail(&self, video_id: &str, thumbnail_path: &str) -> StudioResult<Value> {
        let path = format!("/thumbnail/update/{}", segment(video_id));
        let body = ThumbnailUpdate {
            thumbnail_path: thumbnail_path.to_string(),
        };
        self.rest.post("youtube_update_thumbnail", &path, &body).await
    }

    async fn update_thumbnail_by_project(&self, project_id: &str) -> StudioResult<Value> {
        let path = format!("/thumbnail/update-by-project/{}", segment(project_id));
        self.rest
            .post_empty("youtube_update_thumbnail_by_project", &path, &[])
            .await
    }

    async fn thumbnail_info(&self, video_id: &str) -> StudioResult<Value> {
        let path = format!("/thumbnail/info/{}", segment(video_id));
        self.rest.get("youtube_thumbnail_info", &path).await
    }
}
