//! In-memory fakes of the API traits for state-layer tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;
use vstudio_client::{ProjectsApi, StudioError, StudioResult, YouTubeApi};
use vstudio_models::{
    AudioRequest, AuthStatus, AuthUrlResponse, ChannelInfo, DescriptionRequest,
    DescriptionResponse, ImagesRequest, MetadataUpdate, PrivacyStatus, Project, ScheduleRequest,
    ScheduleResponse, SceneImage, SceneImageRequest, SceneImageResponse, ScriptRequest,
    UploadResponse, VideoRequest,
};

fn server_error(detail: &str) -> StudioError {
    StudioError::from_http_status(500, json!({ "detail": detail }).to_string())
}

/// Shared knobs of both fakes.
#[derive(Default)]
pub struct Controls {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl Controls {
    fn record(&self, op: &str) {
        self.calls.lock().unwrap().push(op.to_string());
    }

    async fn enter(&self, op: &str) -> StudioResult<()> {
        self.record(op);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(server_error(&format!("{} exploded", op)));
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }

    pub fn fail(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Hold every call until the returned handle is notified.
    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    /// Stop holding new calls.
    pub fn ungate(&self) {
        *self.gate.lock().unwrap() = None;
    }
}

/// Core project API backed by a map.
#[derive(Default)]
pub struct FakeProjects {
    pub controls: Controls,
    store: Mutex<HashMap<String, Project>>,
    next_id: AtomicU32,
}

impl FakeProjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        let fake = Self::new();
        for project in projects {
            if let Some(id) = project.id.clone() {
                fake.store.lock().unwrap().insert(id, project);
            }
        }
        fake
    }

    pub fn stored(&self, id: &str) -> Option<Project> {
        self.store.lock().unwrap().get(id).cloned()
    }

    fn stamp(project: &mut Project) {
        project.updated_at = Some("2024-06-01T12:00:00Z".to_string());
    }
}

#[async_trait]
impl ProjectsApi for FakeProjects {
    async fn list(&self) -> StudioResult<Vec<Project>> {
        self.controls.enter("list").await?;
        let mut projects: Vec<Project> = self.store.lock().unwrap().values().cloned().collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(projects)
    }

    async fn get(&self, id: &str) -> StudioResult<Project> {
        self.controls.enter("get").await?;
        self.stored(id)
            .ok_or_else(|| StudioError::from_http_status(404, r#"{"detail":"Project not found"}"#))
    }

    async fn create(&self, project: &Project) -> StudioResult<Project> {
        self.controls.enter("create").await?;
        let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut saved = project.clone();
        saved.id = Some(id.clone());
        Self::stamp(&mut saved);
        self.store.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, id: &str, project: &Project) -> StudioResult<Project> {
        self.controls.enter("update").await?;
        let mut saved = project.clone();
        saved.id = Some(id.to_string());
        Self::stamp(&mut saved);
        self.store.lock().unwrap().insert(id.to_string(), saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> StudioResult<()> {
        self.controls.enter("delete").await?;
        self.store.lock().unwrap().remove(id);
        Ok(())
    }

    async fn generate_script(&self, id: &str, request: &ScriptRequest) -> StudioResult<Project> {
        self.controls.enter("generate_script").await?;
        let mut project = self.stored(id).unwrap_or_default();
        project.script_text = format!("A script about {}", request.title);
        project.status = vstudio_models::ProjectStatus::ScriptGenerated;
        Ok(project)
    }

    async fn generate_audio(&self, id: &str, _request: &AudioRequest) -> StudioResult<Project> {
        self.controls.enter("generate_audio").await?;
        let mut project = self.stored(id).unwrap_or_default();
        project.audio_url = Some(format!("/media/{}.mp3", id));
        Ok(project)
    }

    async fn generate_images(&self, id: &str, request: &ImagesRequest) -> StudioResult<Project> {
        self.controls.enter("generate_images").await?;
        let mut project = self.stored(id).unwrap_or_default();
        project.images = request
            .images
            .iter()
            .enumerate()
            .map(|(i, scene)| SceneImage {
                prompt: scene.prompt.clone(),
                url: Some(format!("/media/{}-{}.png", id, i)),
            })
            .collect();
        Ok(project)
    }

    async fn generate_scene_image(
        &self,
        id: &str,
        index: usize,
        _request: &SceneImageRequest,
    ) -> StudioResult<SceneImageResponse> {
        self.controls.enter("generate_scene_image").await?;
        Ok(SceneImageResponse {
            image_url: Some(format!("/media/{}-{}.png", id, index)),
        })
    }

    async fn generate_video(&self, id: &str, _request: &VideoRequest) -> StudioResult<Project> {
        self.controls.enter("generate_video").await?;
        let mut project = self.stored(id).unwrap_or_default();
        project.video_url = Some(format!("/media/{}.mp4", id));
        project.duration = 12.5;
        project.thumbnail = Some(format!("/media/{}.jpg", id));
        Ok(project)
    }

    async fn generate_description(
        &self,
        request: &DescriptionRequest,
    ) -> StudioResult<DescriptionResponse> {
        self.controls.enter("generate_description").await?;
        Ok(DescriptionResponse {
            description: format!("All about {}", request.title),
        })
    }
}

/// YouTube proxy with a connection flag.
pub struct FakeYouTube {
    pub controls: Controls,
    authenticated: Mutex<bool>,
}

impl FakeYouTube {
    pub fn new(authenticated: bool) -> Self {
        Self {
            controls: Controls::default(),
            authenticated: Mutex::new(authenticated),
        }
    }

    pub fn set_authenticated(&self, value: bool) {
        *self.authenticated.lock().unwrap() = value;
    }
}

#[async_trait]
impl YouTubeApi for FakeYouTube {
    async fn auth_url(&self) -> StudioResult<AuthUrlResponse> {
        self.controls.enter("auth_url").await?;
        Ok(AuthUrlResponse {
            auth_url: "https://accounts.example.com/o/oauth2/auth?state=abc".to_string(),
        })
    }

    async fn auth_status(&self) -> StudioResult<AuthStatus> {
        self.controls.enter("auth_status").await?;
        let is_authenticated = *self.authenticated.lock().unwrap();
        Ok(AuthStatus {
            is_authenticated,
            channel_id: is_authenticated.then(|| "UC1".to_string()),
        })
    }

    async fn disconnect(&self) -> StudioResult<()> {
        self.controls.enter("disconnect").await?;
        self.set_authenticated(false);
        Ok(())
    }

    async fn channel_info(&self) -> StudioResult<ChannelInfo> {
        self.controls.enter("channel_info").await?;
        Ok(ChannelInfo {
            channel_id: Some("UC1".to_string()),
            channel_title: "Studio Channel".to_string(),
            subscriber_count: 1200,
            ..ChannelInfo::default()
        })
    }

    async fn upload_video(
        &self,
        project_id: &str,
        privacy: PrivacyStatus,
    ) -> StudioResult<UploadResponse> {
        self.controls.enter("upload_video").await?;
        self.controls.record(&format!("privacy:{}", privacy));
        Ok(UploadResponse {
            youtube_video_id: format!("yt-{}", project_id),
            youtube_url: Some(format!("https://youtu.be/yt-{}", project_id)),
            uploaded_at: Some("2024-06-01T12:00:00Z".to_string()),
        })
    }

    async fn schedule_video(
        &self,
        project_id: &str,
        request: &ScheduleRequest,
    ) -> StudioResult<ScheduleResponse> {
        self.controls.enter("schedule_video").await?;
        Ok(ScheduleResponse {
            youtube_video_id: Some(format!("yt-{}", project_id)),
            scheduled_publish_at: Some(request.publish_at.clone()),
            is_premiere: request.is_premiere,
        })
    }

    async fn update_metadata(&self, _video_id: &str, update: &MetadataUpdate) -> StudioResult<Value> {
        self.controls.enter("update_metadata").await?;
        Ok(json!({ "title": update.title }))
    }

    async fn video_info(&self, video_id: &str) -> StudioResult<Value> {
        self.controls.enter("video_info").await?;
        Ok(json!({ "id": video_id }))
    }

    async fn update_thumbnail(&self, _video_id: &str, _thumbnail_path: &str) -> StudioResult<Value> {
        self.controls.enter("update_thumbnail").await?;
        Ok(json!({ "success": true }))
    }

    async fn update_thumbnail_by_project(&self, _project_id: &str) -> StudioResult<Value> {
        self.controls.enter("update_thumbnail_by_project").await?;
        Ok(json!({ "success": true }))
    }

    async fn thumbnail_info(&self, video_id: &str) -> StudioResult<Value> {
        self.controls.enter("thumbnail_info").await?;
        Ok(json!({ "id": video_id }))
    }
}
