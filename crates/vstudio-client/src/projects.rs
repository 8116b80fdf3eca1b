//! Core project API client.
//!
//! CRUD on `/projects` plus the stage generation endpoints. Every project
//! payload coming back from the server is decoded through
//! [`Project::from_value`] so legacy field shapes are normalized in one place.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use vstudio_models::{
    AudioRequest, DescriptionRequest, DescriptionResponse, ImagesRequest, Project,
    SceneImageRequest, SceneImageResponse, ScriptRequest, VideoRequest,
};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::transport::{segment, RequestInterceptor, RestClient};

/// Path prefix of the core API.
pub const API_PREFIX: &str = "/api/v1";

/// Operations of the core project API.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list(&self) -> StudioResult<Vec<Project>>;

    async fn get(&self, id: &str) -> StudioResult<Project>;

    async fn create(&self, project: &Project) -> StudioResult<Project>;

    async fn update(&self, id: &str, project: &Project) -> StudioResult<Project>;

    async fn delete(&self, id: &str) -> StudioResult<()>;

    async fn generate_script(&self, id: &str, request: &ScriptRequest) -> StudioResult<Project>;

    async fn generate_audio(&self, id: &str, request: &AudioRequest) -> StudioResult<Project>;

    async fn generate_images(&self, id: &str, request: &ImagesRequest) -> StudioResult<Project>;

    async fn generate_scene_image(
        &self,
        id: &str,
        index: usize,
        request: &SceneImageRequest,
    ) -> StudioResult<SceneImageResponse>;

    async fn generate_video(&self, id: &str, request: &VideoRequest) -> StudioResult<Project>;

    async fn generate_description(
        &self,
        request: &DescriptionRequest,
    ) -> StudioResult<DescriptionResponse>;
}

#[async_trait]
impl<T: ProjectsApi + ?Sized> ProjectsApi for Arc<T> {
    async fn list(&self) -> StudioResult<Vec<Project>> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> StudioResult<Project> {
        (**self).get(id).await
    }

    async fn create(&self, project: &Project) -> StudioResult<Project> {
        (**self).create(project).await
    }

    async fn update(&self, id: &str, project: &Project) -> StudioResult<Project> {
        (**self).update(id, project).await
    }

    async fn delete(&self, id: &str) -> StudioResult<()> {
        (**self).delete(id).await
    }

    async fn generate_script(&self, id: &str, request: &ScriptRequest) -> StudioResult<Project> {
        (**self).generate_script(id, request).await
    }

    async fn generate_audio(&self, id: &str, request: &AudioRequest) -> StudioResult<Project> {
        (**self).generate_audio(id, request).await
    }

    async fn generate_images(&self, id: &str, request: &ImagesRequest) -> StudioResult<Project> {
        (**self).generate_images(id, request).await
    }

    async fn generate_scene_image(
        &self,
        id: &str,
        index: usize,
        request: &SceneImageRequest,
    ) -> StudioResult<SceneImageResponse> {
        (**self).generate_scene_image(id, index, request).await
    }

    async fn generate_video(&self, id: &str, request: &VideoRequest) -> StudioResult<Project> {
        (**self).generate_video(id, request).await
    }

    async fn generate_description(
        &self,
        request: &DescriptionRequest,
    ) -> StudioResult<DescriptionResponse> {
        (**self).generate_description(request).await
    }
}

/// HTTP client for the core project API.
#[derive(Debug, Clone)]
pub struct ProjectsClient {
    rest: RestClient,
}

impl ProjectsClient {
    pub fn new(config: &StudioConfig) -> StudioResult<Self> {
        let rest = RestClient::new(format!("{}{}", config.api_base_url, API_PREFIX), config)?;
        Ok(Self { rest })
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.rest = self.rest.with_interceptor(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    fn decode_project(value: Value) -> StudioResult<Project> {
        Ok(Project::from_value(value)?)
    }

    async fn post_project<B>(&self, operation: &str, path: &str, body: &B) -> StudioResult<Project>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let value: Value = self.rest.post(operation, path, body).await?;
        Self::decode_project(value)
    }
}

#[async_trait]
impl ProjectsApi for ProjectsClient {
    async fn list(&self) -> StudioResult<Vec<Project>> {
        let value: Value = self.rest.get("list_projects", "/projects").await?;
        let items = match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(StudioError::invalid_response(format!(
                    "list_projects expected an array, got {}",
                    other
                )))
            }
        };

        let projects = items
            .into_iter()
            .map(Self::decode_project)
            .collect::<StudioResult<Vec<_>>>()?;
        debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    async fn get(&self, id: &str) -> StudioResult<Project> {
        let path = format!("/projects/{}", segment(id));
        let value: Value = self.rest.get("get_project", &path).await?;
        Self::decode_project(value)
    }

    async fn create(&self, project: &Project) -> StudioResult<Project> {
        self.post_project("create_project", "/projects", project).await
    }

    async fn update(&self, id: &str, project: &Project) -> StudioResult<Project> {
        let path = format!("/projects/{}", segment(id));
        let value: Value = self.rest.put("update_project", &path, project).await?;
        Self::decode_project(value)
    }

    async fn delete(&self, id: &str) -> StudioResult<()> {
        let path = format!("/projects/{}", segment(id));
        self.rest.delete("delete_project", &path).await
    }

    async fn generate_script(&self, id: &str, request: &ScriptRequest) -> StudioResult<Project> {
        let path = format!("/scripts/{}", segment(id));
        self.post_project("generate_script", &path, request).await
    }

    async fn generate_audio(&self, id: &str, request: &AudioRequest) -> StudioResult<Project> {
        let path = format!("/audios/{}", segment(id));
        self.post_project("generate_audio", &path, request).await
    }

    async fn generate_images(&self, id: &str, request: &ImagesRequest) -> StudioResult<Project> {
        let path = format!("/images/{}", segment(id));
        self.post_project("generate_images", &path, request).await
    }

    async fn generate_scene_image(
        &self,
        id: &str,
        index: usize,
        request: &SceneImageRequest,
    ) -> StudioResult<SceneImageResponse> {
        let path = format!("/images/{}/{}", segment(id), index);
        self.rest.post("generate_scene_image", &path, request).await
    }

    async fn generate_video(&self, id: &str, request: &VideoRequest) -> StudioResult<Project> {
        let path = format!("/video/{}", segment(id));
        self.post_project("generate_video", &path, request).await
    }

    async fn generate_description(
        &self,
        request: &DescriptionRequest,
    ) -> StudioResult<DescriptionResponse> {
        self.rest
            .post("generate_description", "/scripts/description/generate", request)
            .await
    }
}
