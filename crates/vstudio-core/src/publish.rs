//! YouTube publishing panel for one project.
//!
//! The upload always runs first. In scheduled mode the schedule call only
//! follows a successful upload, and a failed schedule leaves the upload in
//! place so it can be scheduled later without uploading again.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use vstudio_client::YouTubeApi;
use vstudio_models::format::parse_timestamp;
use vstudio_models::{
    MetadataUpdate, PrivacyStatus, Project, ProjectStatus, ScheduleRequest, UploadInfo,
};

use crate::busy::BusyFlags;
use crate::logging::ActionLogger;
use crate::outcome::{Availability, Outcome, SkipReason};

/// Message recorded when the upload succeeded but scheduling did not.
pub const SCHEDULE_AFTER_UPLOAD_FAILED: &str =
    "Video uploaded but scheduling failed. You can schedule it later.";

/// Minimum lead time for a scheduled publication.
pub const MIN_SCHEDULE_LEAD_HOURS: i64 = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleFormError {
    #[error("Please select a publication date and time")]
    MissingTime,

    #[error("Invalid publication time: {0}")]
    InvalidTime(String),

    #[error("Select a date at least 1 hour in the future")]
    TooSoon,
}

/// Scheduled publication settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScheduleForm {
    /// `YYYY-MM-DDTHH:MM` (taken as UTC) or RFC 3339
    pub publish_at: String,
    pub is_premiere: bool,
    pub final_privacy_status: PrivacyStatus,
}

impl ScheduleForm {
    pub fn new(publish_at: impl Into<String>) -> Self {
        Self {
            publish_at: publish_at.into(),
            ..Self::default()
        }
    }

    pub fn has_time(&self) -> bool {
        !self.publish_at.trim().is_empty()
    }

    /// Validate against `now` and build the request body.
    pub fn to_request(&self, now: DateTime<Utc>) -> Result<ScheduleRequest, ScheduleFormError> {
        if !self.has_time() {
            return Err(ScheduleFormError::MissingTime);
        }
        let at = parse_timestamp(&self.publish_at)
            .map_err(|_| ScheduleFormError::InvalidTime(self.publish_at.trim().to_string()))?;
        if at < now + Duration::hours(MIN_SCHEDULE_LEAD_HOURS) {
            return Err(ScheduleFormError::TooSoon);
        }
        Ok(ScheduleRequest {
            publish_at: at.to_rfc3339(),
            is_premiere: self.is_premiere,
            final_privacy_status: self.final_privacy_status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PublishMode {
    #[default]
    Immediate,
    Scheduled(ScheduleForm),
}

impl PublishMode {
    /// Privacy sent with the upload.
    pub fn upload_privacy(&self) -> PrivacyStatus {
        match self {
            PublishMode::Immediate => PrivacyStatus::Public,
            PublishMode::Scheduled(_) => PrivacyStatus::Private,
        }
    }
}

/// Whether the project can be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    NotAuthenticated,
    VideoNotReady(ProjectStatus),
    AlreadyUploaded,
    Ready,
}

impl Readiness {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Readiness::NotAuthenticated => {
                Some("You need to connect your YouTube account before uploading videos.")
            }
            Readiness::VideoNotReady(_) => {
                Some("Your video must be generated before uploading to YouTube.")
            }
            Readiness::AlreadyUploaded | Readiness::Ready => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishOp {
    Upload,
    Schedule,
    Thumbnail,
    Metadata,
}

impl fmt::Display for PublishOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PublishOp::Upload => "upload_video",
            PublishOp::Schedule => "schedule_video",
            PublishOp::Thumbnail => "update_thumbnail",
            PublishOp::Metadata => "update_metadata",
        })
    }
}

/// Result of `publish`.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Uploaded(UploadInfo),
    Scheduled(UploadInfo),
    /// The video is on YouTube but the schedule call failed.
    UploadedNotScheduled {
        info: UploadInfo,
        message: String,
    },
    Skipped(SkipReason),
    Failed(String),
}

impl PublishOutcome {
    pub fn message(&self) -> String {
        match self {
            PublishOutcome::Uploaded(_) => "Video uploaded successfully!".to_string(),
            PublishOutcome::Scheduled(_) => {
                "Video uploaded and scheduled successfully!".to_string()
            }
            PublishOutcome::UploadedNotScheduled { message, .. } => message.clone(),
            PublishOutcome::Skipped(reason) => format!("Skipped: {}", reason),
            PublishOutcome::Failed(message) => message.clone(),
        }
    }

    pub fn upload_info(&self) -> Option<&UploadInfo> {
        match self {
            PublishOutcome::Uploaded(info)
            | PublishOutcome::Scheduled(info)
            | PublishOutcome::UploadedNotScheduled { info, .. } => Some(info),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct PublishState {
    project: Project,
    authenticated: bool,
    mode: PublishMode,
    upload_info: Option<UploadInfo>,
    error: Option<String>,
}

/// Upload, schedule and post-upload edits for one project.
pub struct PublishPanel<Y> {
    api: Y,
    state: Mutex<PublishState>,
    busy: BusyFlags<PublishOp>,
}

impl<Y> fmt::Debug for PublishPanel<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishPanel")
            .field("state", &self.state)
            .field("busy", &self.busy)
            .finish()
    }
}

impl<Y: YouTubeApi> PublishPanel<Y> {
    pub fn new(api: Y, project: Project) -> Self {
        let upload_info = UploadInfo::from_project(&project);
        Self {
            api,
            state: Mutex::new(PublishState {
                project,
                authenticated: false,
                mode: PublishMode::Immediate,
                upload_info,
                error: None,
            }),
            busy: BusyFlags::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PublishState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn project_id(&self) -> String {
        self.lock().project.route_id().to_string()
    }

    /// Probe the YouTube connection. Any failure counts as not connected.
    pub async fn check_auth(&self) -> bool {
        let authenticated = match self.api.auth_status().await {
            Ok(status) => status.is_authenticated,
            Err(e) => {
                warn!(error = %e, "Error checking YouTube auth status");
                false
            }
        };
        self.lock().authenticated = authenticated;
        authenticated
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    pub fn readiness(&self) -> Readiness {
        let state = self.lock();
        if !state.authenticated {
            Readiness::NotAuthenticated
        } else if state.upload_info.is_some() {
            Readiness::AlreadyUploaded
        } else if !state.project.is_ready_for_upload() {
            Readiness::VideoNotReady(state.project.status.clone())
        } else {
            Readiness::Ready
        }
    }

    pub fn project(&self) -> Project {
        self.lock().project.clone()
    }

    pub fn upload_info(&self) -> Option<UploadInfo> {
        self.lock().upload_info.clone()
    }

    pub fn mode(&self) -> PublishMode {
        self.lock().mode.clone()
    }

    pub fn set_mode(&self, mode: PublishMode) {
        self.lock().mode = mode;
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    pub fn is_busy(&self, op: PublishOp) -> bool {
        self.busy.is_busy(&op)
    }

    pub fn availability(&self, op: PublishOp) -> Availability {
        match op {
            PublishOp::Upload => {
                if self.busy.is_busy(&PublishOp::Upload) || self.busy.is_busy(&PublishOp::Schedule)
                {
                    return Availability::Busy;
                }
                match self.readiness() {
                    Readiness::NotAuthenticated => {
                        return Availability::Blocked("Connect your YouTube account first")
                    }
                    Readiness::VideoNotReady(_) => {
                        return Availability::Blocked("Generate the video first")
                    }
                    Readiness::AlreadyUploaded => {
                        return Availability::Blocked("Video already uploaded")
                    }
                    Readiness::Ready => {}
                }
                match self.mode() {
                    PublishMode::Scheduled(form) if !form.has_time() => {
                        Availability::Blocked("Select a publication time")
                    }
                    _ => Availability::Enabled,
                }
            }
            PublishOp::Schedule | PublishOp::Thumbnail | PublishOp::Metadata => {
                let state = self.lock();
                if self.busy.is_busy(&op) {
                    Availability::Busy
                } else if !state.authenticated {
                    Availability::Blocked("Connect your YouTube account first")
                } else if state.upload_info.is_none() {
                    Availability::Blocked("Upload the video first")
                } else {
                    Availability::Enabled
                }
            }
        }
    }

    fn record_error(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    fn store_upload(&self, info: &UploadInfo) {
        let mut state = self.lock();
        state.project.youtube_video_id = Some(info.youtube_video_id.clone());
        state.project.youtube_url = info.youtube_url.clone();
        state.project.youtube_uploaded_at = info.uploaded_at.clone();
        state.project.youtube_scheduled_publish_at = info.scheduled_publish_at.clone();
        state.project.youtube_is_premiere = info.is_premiere;
        state.upload_info = Some(info.clone());
    }

    /// Upload the video, then schedule it or refresh its thumbnail.
    pub async fn publish(&self) -> PublishOutcome {
        if let Some(Outcome::Skipped(reason)) =
            Outcome::from_availability(self.availability(PublishOp::Upload))
        {
            return PublishOutcome::Skipped(reason);
        }

        let mode = self.mode();
        let schedule_request = match &mode {
            PublishMode::Immediate => None,
            PublishMode::Scheduled(form) => match form.to_request(Utc::now()) {
                Ok(request) => Some(request),
                Err(e) => {
                    let message = e.to_string();
                    self.record_error(&message);
                    return PublishOutcome::Failed(message);
                }
            },
        };

        let Some(_upload) = self.busy.try_begin(PublishOp::Upload) else {
            return PublishOutcome::Skipped(SkipReason::Busy);
        };
        self.dismiss_error();

        let project_id = self.project_id();
        let logger = ActionLogger::new(&project_id, "publish");
        let privacy = mode.upload_privacy();
        logger.log_start(&format!("uploading as {}", privacy));

        let info = match self.api.upload_video(&project_id, privacy).await {
            Ok(response) => UploadInfo::from_upload(&response),
            Err(e) => {
                logger.log_error(&e.to_string());
                let message = e.user_message("Failed to upload video to YouTube");
                self.record_error(&message);
                return PublishOutcome::Failed(message);
            }
        };
        self.store_upload(&info);

        let Some(request) = schedule_request else {
            if let Err(e) = self.api.update_thumbnail_by_project(&project_id).await {
                logger.log_warning(&format!(
                    "Failed to update thumbnail, but upload succeeded: {}",
                    e
                ));
            }
            logger.log_completion(&format!("uploaded as {}", info.youtube_video_id));
            return PublishOutcome::Uploaded(info);
        };

        let Some(_schedule) = self.busy.try_begin(PublishOp::Schedule) else {
            self.record_error(SCHEDULE_AFTER_UPLOAD_FAILED);
            return PublishOutcome::UploadedNotScheduled {
                info,
                message: SCHEDULE_AFTER_UPLOAD_FAILED.to_string(),
            };
        };

        match self.api.schedule_video(&project_id, &request).await {
            Ok(response) => {
                let info = info.with_schedule(&response);
                self.store_upload(&info);
                self.lock().project.status = ProjectStatus::ScheduledForPublish;
                logger.log_completion(&format!("scheduled for {}", request.publish_at));
                PublishOutcome::Scheduled(info)
            }
            Err(e) => {
                logger.log_warning(&format!("Scheduling failed: {}", e));
                self.record_error(SCHEDULE_AFTER_UPLOAD_FAILED);
                PublishOutcome::UploadedNotScheduled {
                    info,
                    message: SCHEDULE_AFTER_UPLOAD_FAILED.to_string(),
                }
            }
        }
    }

    /// Schedule an already uploaded video. Never uploads.
    pub async fn schedule(&self, form: &ScheduleForm) -> Outcome {
        if let Some(skipped) = Outcome::from_availability(self.availability(PublishOp::Schedule)) {
            return skipped;
        }
        let request = match form.to_request(Utc::now()) {
            Ok(request) => request,
            Err(e) => {
                let message = e.to_string();
                self.record_error(&message);
                return Outcome::Failed(message);
            }
        };
        let Some(_guard) = self.busy.try_begin(PublishOp::Schedule) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        let project_id = self.project_id();
        let logger = ActionLogger::new(&project_id, "schedule");
        logger.log_start(&request.publish_at);

        match self.api.schedule_video(&project_id, &request).await {
            Ok(response) => {
                let info = self.upload_info().unwrap_or_default().with_schedule(&response);
                self.store_upload(&info);
                let mut state = self.lock();
                state.project.status = ProjectStatus::ScheduledForPublish;
                state.error = None;
                drop(state);
                logger.log_completion("scheduled");
                Outcome::Done("Video scheduled successfully!".to_string())
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                let message = e.user_message("Failed to schedule video");
                self.record_error(&message);
                Outcome::Failed(message)
            }
        }
    }

    /// Push the project thumbnail to the uploaded video.
    pub async fn update_thumbnail(&self) -> Outcome {
        if let Some(skipped) = Outcome::from_availability(self.availability(PublishOp::Thumbnail))
        {
            return skipped;
        }
        let Some(_guard) = self.busy.try_begin(PublishOp::Thumbnail) else {
            return Outcome::Skipped(SkipReason::Busy);
        };
        let project_id = self.project_id();
        debug!(project_id = %project_id, "Updating YouTube thumbnail");

        match self.api.update_thumbnail_by_project(&project_id).await {
            Ok(_) => {
                self.dismiss_error();
                Outcome::Done("Thumbnail updated successfully!".to_string())
            }
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Error updating thumbnail");
                let message = e.user_message("Failed to update thumbnail");
                self.record_error(&message);
                Outcome::Failed(message)
            }
        }
    }

    /// Edit title, description and comma-separated tags of the uploaded video.
    pub async fn update_metadata(&self, title: &str, description: &str, tags: &str) -> Outcome {
        let update = match MetadataUpdate::from_form(title, description, tags) {
            Ok(update) => update,
            Err(e) => {
                let message = e.user_message();
                self.record_error(&message);
                return Outcome::Failed(message);
            }
        };
        if let Some(skipped) = Outcome::from_availability(self.availability(PublishOp::Metadata)) {
            return skipped;
        }
        let Some(video_id) = self.upload_info().map(|info| info.youtube_video_id) else {
            return Outcome::Skipped(SkipReason::Blocked("Upload the video first"));
        };
        let Some(_guard) = self.busy.try_begin(PublishOp::Metadata) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        match self.api.update_metadata(&video_id, &update).await {
            Ok(_) => {
                self.dismiss_error();
                Outcome::Done("Metadata updated successfully!".to_string())
            }
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Error updating metadata");
                let message = e.user_message("Failed to update video metadata");
                self.record_error(&message);
                Outcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeYouTube;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn rendered_project() -> Project {
        let mut project = Project::new_draft();
        project.id = Some("p1".into());
        project.status = ProjectStatus::VideoReady;
        project.video_url = Some("/media/p1.mp4".into());
        project
    }

    async fn connected_panel(project: Project) -> (Arc<FakeYouTube>, PublishPanel<Arc<FakeYouTube>>) {
        let api = Arc::new(FakeYouTube::new(true));
        let panel = PublishPanel::new(Arc::clone(&api), project);
        assert!(panel.check_auth().await);
        (api, panel)
    }

    fn future_form() -> ScheduleForm {
        ScheduleForm {
            publish_at: "2099-01-01T10:00".into(),
            is_premiere: true,
            final_privacy_status: PrivacyStatus::Unlisted,
        }
    }

    #[test]
    fn test_schedule_form_validation() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(
            ScheduleForm::new("").to_request(now),
            Err(ScheduleFormError::MissingTime)
        );
        assert_eq!(
            ScheduleForm::new("2024-06-01T12:30").to_request(now),
            Err(ScheduleFormError::TooSoon)
        );
        assert!(matches!(
            ScheduleForm::new("tomorrow").to_request(now),
            Err(ScheduleFormError::InvalidTime(_))
        ));

        let request = ScheduleForm::new("2024-06-01T13:00").to_request(now).unwrap();
        assert_eq!(request.publish_at, "2024-06-01T13:00:00+00:00");
        assert_eq!(request.final_privacy_status, PrivacyStatus::Public);
    }

    #[tokio::test]
    async fn test_readiness() {
        let api = Arc::new(FakeYouTube::new(false));
        let panel = PublishPanel::new(Arc::clone(&api), rendered_project());
        panel.check_auth().await;
        assert_eq!(panel.readiness(), Readiness::NotAuthenticated);
        assert!(panel.readiness().warning().is_some());

        api.set_authenticated(true);
        panel.check_auth().await;
        assert_eq!(panel.readiness(), Readiness::Ready);

        let mut draft = rendered_project();
        draft.status = ProjectStatus::ImagesReady;
        let (_api, panel) = connected_panel(draft).await;
        assert_eq!(
            panel.readiness(),
            Readiness::VideoNotReady(ProjectStatus::ImagesReady)
        );

        let mut uploaded = rendered_project();
        uploaded.youtube_video_id = Some("yt-old".into());
        let (_api, panel) = connected_panel(uploaded).await;
        assert_eq!(panel.readiness(), Readiness::AlreadyUploaded);
        assert_eq!(panel.upload_info().unwrap().youtube_video_id, "yt-old");
    }

    #[tokio::test]
    async fn test_auth_failure_counts_as_disconnected() {
        let api = Arc::new(FakeYouTube::new(true));
        api.controls.fail("auth_status");
        let panel = PublishPanel::new(Arc::clone(&api), rendered_project());
        assert!(!panel.check_auth().await);
        assert_eq!(panel.readiness(), Readiness::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_immediate_upload_is_public_and_updates_thumbnail() {
        let (api, panel) = connected_panel(rendered_project()).await;
        api.controls.fail("update_thumbnail_by_project");

        let outcome = panel.publish().await;

        assert_eq!(outcome.message(), "Video uploaded successfully!");
        assert_eq!(outcome.upload_info().unwrap().youtube_video_id, "yt-p1");
        assert_eq!(api.controls.count("privacy:public"), 1);
        assert_eq!(api.controls.count("update_thumbnail_by_project"), 1);
        assert!(panel.error().is_none());
        assert_eq!(panel.readiness(), Readiness::AlreadyUploaded);
    }

    #[tokio::test]
    async fn test_scheduled_upload_is_private_then_scheduled() {
        let (api, panel) = connected_panel(rendered_project()).await;
        panel.set_mode(PublishMode::Scheduled(future_form()));

        let outcome = panel.publish().await;

        let PublishOutcome::Scheduled(info) = outcome else {
            panic!("expected scheduled outcome, got {:?}", outcome);
        };
        assert_eq!(info.scheduled_publish_at.as_deref(), Some("2099-01-01T10:00:00+00:00"));
        assert!(info.is_premiere);
        assert_eq!(api.controls.count("privacy:private"), 1);
        assert_eq!(api.controls.count("update_thumbnail_by_project"), 0);
        assert_eq!(panel.project().status, ProjectStatus::ScheduledForPublish);
    }

    #[tokio::test]
    async fn test_scheduled_without_time_is_disabled() {
        let (api, panel) = connected_panel(rendered_project()).await;
        panel.set_mode(PublishMode::Scheduled(ScheduleForm::default()));

        assert_eq!(
            panel.availability(PublishOp::Upload),
            Availability::Blocked("Select a publication time")
        );
        assert!(matches!(panel.publish().await, PublishOutcome::Skipped(_)));
        assert_eq!(api.controls.count("upload_video"), 0);
    }

    #[tokio::test]
    async fn test_too_soon_schedule_never_uploads() {
        let (api, panel) = connected_panel(rendered_project()).await;
        let soon = (Utc::now() + Duration::minutes(10)).format("%Y-%m-%dT%H:%M").to_string();
        panel.set_mode(PublishMode::Scheduled(ScheduleForm::new(soon)));

        let outcome = panel.publish().await;

        assert_eq!(
            outcome,
            PublishOutcome::Failed("Select a date at least 1 hour in the future".into())
        );
        assert_eq!(api.controls.count("upload_video"), 0);
    }

    #[tokio::test]
    async fn test_schedule_failure_after_upload_is_distinct() {
        let (api, panel) = connected_panel(rendered_project()).await;
        api.controls.fail("schedule_video");
        panel.set_mode(PublishMode::Scheduled(future_form()));

        let outcome = panel.publish().await;

        let PublishOutcome::UploadedNotScheduled { info, message } = outcome else {
            panic!("expected partial outcome, got {:?}", outcome);
        };
        assert_eq!(info.youtube_video_id, "yt-p1");
        assert_eq!(message, SCHEDULE_AFTER_UPLOAD_FAILED);
        assert_eq!(panel.error().as_deref(), Some(SCHEDULE_AFTER_UPLOAD_FAILED));
        assert_eq!(panel.upload_info().unwrap().youtube_video_id, "yt-p1");

        // Scheduling later reuses the upload
        api.controls.recover("schedule_video");
        assert!(panel.schedule(&future_form()).await.is_done());
        assert_eq!(api.controls.count("upload_video"), 1);
        assert_eq!(api.controls.count("schedule_video"), 2);
        assert!(panel.upload_info().unwrap().is_scheduled());
        assert!(panel.error().is_none());
    }

    #[tokio::test]
    async fn test_upload_failure_uses_server_detail() {
        let (api, panel) = connected_panel(rendered_project()).await;
        api.controls.fail("upload_video");

        let outcome = panel.publish().await;

        assert_eq!(outcome, PublishOutcome::Failed("upload_video exploded".into()));
        assert!(panel.upload_info().is_none());
        assert_eq!(panel.readiness(), Readiness::Ready);
    }

    #[tokio::test]
    async fn test_schedule_requires_upload() {
        let (api, panel) = connected_panel(rendered_project()).await;
        let outcome = panel.schedule(&future_form()).await;
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::Blocked("Upload the video first"))
        );
        assert_eq!(api.controls.calls(), vec!["auth_status"]);
    }

    #[tokio::test]
    async fn test_thumbnail_and_metadata() {
        let mut uploaded = rendered_project();
        uploaded.youtube_video_id = Some("yt-p1".into());
        let (api, panel) = connected_panel(uploaded).await;

        assert_eq!(
            panel.update_thumbnail().await,
            Outcome::Done("Thumbnail updated successfully!".into())
        );

        assert_eq!(
            panel.update_metadata("  ", "desc", "a,b").await,
            Outcome::Failed("Title is required".into())
        );
        assert_eq!(api.controls.count("update_metadata"), 0);

        assert!(panel.update_metadata("New title", "desc", "a, b").await.is_done());
        api.controls.fail("update_metadata");
        assert_eq!(
            panel.update_metadata("New title", "", "").await,
            Outcome::Failed("update_metadata exploded".into())
        );
    }
    #[tokio::test]
    async fn test_metadata_reports_the_failing_rule() {
        let mut uploaded = rendered_project();
        uploaded.youtube_video_id = Some("yt-p1".into());
        let (api, panel) = connected_panel(uploaded).await;

        assert_eq!(
            panel.update_metadata(&"t".repeat(101), "", "").await,
            Outcome::Failed("Title must be 100 characters or fewer".into())
        );
        assert_eq!(
            panel.update_metadata("Fine", &"d".repeat(5001), "").await,
            Outcome::Failed("Description must be 5000 characters or fewer".into())
        );
        assert_eq!(
            panel.error().as_deref(),
            Some("Description must be 5000 characters or fewer")
        );
        assert_eq!(api.controls.count("update_metadata"), 0);
    }

    #[tokio::test]
    async fn test_post_upload_actions_need_a_connected_account() {
        let mut uploaded = rendered_project();
        uploaded.youtube_video_id = Some("yt-p1".into());
        let api = Arc::new(FakeYouTube::new(false));
        let panel = PublishPanel::new(Arc::clone(&api), uploaded);
        assert!(!panel.check_auth().await);

        let blocked = Availability::Blocked("Connect your YouTube account first");
        for op in [PublishOp::Schedule, PublishOp::Thumbnail, PublishOp::Metadata] {
            assert_eq!(panel.availability(op), blocked);
        }

        let skipped = Outcome::Skipped(SkipReason::Blocked("Connect your YouTube account first"));
        assert_eq!(panel.schedule(&future_form()).await, skipped);
        assert_eq!(panel.update_thumbnail().await, skipped);
        assert_eq!(panel.update_metadata("Title", "", "").await, skipped);
        assert_eq!(api.controls.calls(), vec!["auth_status"]);
    }
}
