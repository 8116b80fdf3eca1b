//! Tests for the HTTP clients against a mock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vstudio_models::{
    AudioRequest, DescriptionRequest, PrivacyStatus, Project, ProjectStatus, ScheduleRequest,
    SceneImageRequest, ScriptRequest,
};

use crate::config::{RuntimeValues, StudioConfig, API_BASE_URL_KEY};
use crate::error::StudioError;
use crate::projects::{ProjectsApi, ProjectsClient};
use crate::retry::RetryConfig;
use crate::transport::BearerToken;
use crate::youtube::{YouTubeApi, YouTubeClient};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(server: &MockServer) -> StudioConfig {
    StudioConfig {
        api_base_url: server.uri(),
        youtube_api_base_url: server.uri(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    }
}

fn project_json(id: &str, title: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": status,
        "script_text": "",
    })
}

// =============================================================================
// Projects API
// =============================================================================

#[tokio::test]
async fn test_list_projects_migrates_legacy_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json("p1", "First", "draft"),
            {
                "id": "p2",
                "title": "Legacy",
                "status": "images_ready",
                "images_prompts": ["a cat", "a dog"],
                "audio_path": "/media/p2.mp3"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let projects = client.list().await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id.as_deref(), Some("p1"));
    assert_eq!(projects[1].images.len(), 2);
    assert_eq!(projects[1].images[1].prompt, "a dog");
    assert_eq!(projects[1].audio_url.as_deref(), Some("/media/p2.mp3"));
    assert!(!projects[1].extra.contains_key("images_prompts"));
}

#[tokio::test]
async fn test_list_projects_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_projects_rejects_non_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, StudioError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_get_project_not_found_keeps_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Project not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let err = client.get("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.detail(), Some("Project not found"));
    assert_eq!(err.user_message("Failed to load project"), "Project not found");
}

#[tokio::test]
async fn test_create_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let err = client.create(&Project::new_draft()).await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
    assert_eq!(err.user_message("Failed to save project"), "Failed to save project");
}

#[tokio::test]
async fn test_update_sends_full_project() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/projects/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "title": "Renamed",
            "status": "draft",
            "updatedAt": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let mut project = Project::new_draft();
    project.id = Some("p1".into());
    project.title = "Renamed".into();

    let saved = client.update("p1", &project).await.unwrap();
    assert_eq!(saved.title, "Renamed");
    assert_eq!(saved.updated_at.as_deref(), Some("2024-05-01T10:00:00Z"));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["title"], "Renamed");
    assert_eq!(sent["voice_id"], "alloy");
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/projects/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    client.delete("p1").await.unwrap();
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("a b", "Spaced", "draft")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let project = client.get("a b").await.unwrap();
    assert_eq!(project.title, "Spaced");
}

#[tokio::test]
async fn test_generate_script_for_unsaved_draft() {
    let server = MockServer::start().await;
    let draft = Project::new_draft();
    let request = ScriptRequest::from_project(&draft);

    Mock::given(method("POST"))
        .and(path("/api/v1/scripts/temp"))
        .and(body_json(json!({
            "title": "Untitled Project",
            "description": "",
            "use_case": "explanation",
            "language": "en",
            "style": "educational",
            "nb_section": 1,
            "keywords": "",
            "video_inspirations": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "script_text": "Once upon a time",
            "status": "script_generated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let result = client.generate_script(draft.route_id(), &request).await.unwrap();

    assert_eq!(result.script_text, "Once upon a time");
    assert_eq!(result.status, ProjectStatus::ScriptGenerated);
}

#[tokio::test]
async fn test_generate_audio_and_scene_image_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/audios/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"audio_url": "/a.mp3"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/images/p1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "/img/2.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let mut project = Project::new_draft();
    project.script_text = "Hello".into();

    let audio = client
        .generate_audio("p1", &AudioRequest::from_project(&project))
        .await
        .unwrap();
    assert_eq!(audio.audio_url.as_deref(), Some("/a.mp3"));

    let scene = SceneImageRequest {
        prompt: "a lighthouse".into(),
        style: "realistic".into(),
    };
    let image = client.generate_scene_image("p1", 2, &scene).await.unwrap();
    assert_eq!(image.image_url.as_deref(), Some("/img/2.png"));
}

#[tokio::test]
async fn test_generate_description_accepts_alias() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scripts/description/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"video_description": "Watch this"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let response = client
        .generate_description(&DescriptionRequest::from_project(&Project::new_draft()))
        .await
        .unwrap();
    assert_eq!(response.description, "Watch this");
}

#[tokio::test]
async fn test_interceptor_attaches_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server))
        .unwrap()
        .with_interceptor(Arc::new(BearerToken::new("abc123")));
    client.list().await.unwrap();
}

#[tokio::test]
async fn test_validation_detail_list_is_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/video/p1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"msg": "fps must be positive"}, {"msg": "unknown template"}]
        })))
        .mount(&server)
        .await;

    let client = ProjectsClient::new(&test_config(&server)).unwrap();
    let err = client
        .generate_video("p1", &vstudio_models::VideoRequest::from_project(&Project::new_draft()))
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::RequestFailed(_)));
    assert_eq!(err.detail(), Some("fps must be positive; unknown template"));
}

// =============================================================================
// YouTube API
// =============================================================================

#[tokio::test]
async fn test_auth_status_and_channel_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/youtube/auth/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_authenticated": true,
            "channel_id": "UC123"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/youtube/channel/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channel_id": "UC123",
            "channel_title": "Studio",
            "subscriber_count": 42
        })))
        .mount(&server)
        .await;

    let client = YouTubeClient::new(&test_config(&server)).unwrap();
    let status = client.auth_status().await.unwrap();
    assert!(status.is_authenticated);

    let channel = client.channel_info().await.unwrap();
    assert_eq!(channel.channel_title, "Studio");
    assert_eq!(channel.subscriber_count, 42);
    assert_eq!(channel.video_count, 0);
}

#[tokio::test]
async fn test_upload_passes_privacy_and_is_sent_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/youtube/videos/upload/p1"))
        .and(query_param("privacy_status", "private"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = YouTubeClient::new(&test_config(&server)).unwrap();
    let err = client
        .upload_video("p1", PrivacyStatus::Private)
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::ServerError(_)));
}

#[tokio::test]
async fn test_schedule_video_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/youtube/videos/schedule/p1"))
        .and(body_json(json!({
            "publish_at": "2030-01-01T10:00",
            "is_premiere": true,
            "final_privacy_status": "public"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "youtube_video_id": "yt1",
            "scheduled_publish_at": "2030-01-01T10:00:00Z",
            "is_premiere": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = YouTubeClient::new(&test_config(&server)).unwrap();
    let request = ScheduleRequest {
        publish_at: "2030-01-01T10:00".into(),
        is_premiere: true,
        final_privacy_status: PrivacyStatus::Public,
    };
    let response = client.schedule_video("p1", &request).await.unwrap();
    assert_eq!(response.youtube_video_id.as_deref(), Some("yt1"));
    assert!(response.is_premiere);
}

#[tokio::test]
async fn test_metadata_and_thumbnail_routes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/youtube/videos/yt1"))
        .and(body_json(json!({"title": "T", "description": "", "tags": ["a"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/youtube/thumbnail/update/yt1"))
        .and(body_json(json!({"thumbnail_path": "/thumbs/p1.png"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/youtube/thumbnail/update-by-project/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = YouTubeClient::new(&test_config(&server)).unwrap();
    let update = vstudio_models::MetadataUpdate::from_form("T", "", "a").unwrap();
    client.update_metadata("yt1", &update).await.unwrap();
    client.update_thumbnail("yt1", "/thumbs/p1.png").await.unwrap();
    let body = client.update_thumbnail_by_project("p1").await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_unauthorized_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/youtube/auth/url"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "No session"})))
        .mount(&server)
        .await;

    let client = YouTubeClient::new(&test_config(&server)).unwrap();
    let err = client.auth_url().await.unwrap_err();
    assert!(matches!(err, StudioError::Unauthorized(_)));
    assert!(!err.is_retryable());
    assert_eq!(err.detail(), Some("No session"));
}

// =============================================================================
// Configuration from the process environment
// =============================================================================

#[test]
#[serial]
fn test_config_from_env() {
    std::env::set_var(API_BASE_URL_KEY, "https://env.example.com/");
    std::env::set_var("STUDIO_CONNECT_TIMEOUT_SECS", "9");

    let config = StudioConfig::from_env(&RuntimeValues::empty()).unwrap();

    std::env::remove_var(API_BASE_URL_KEY);
    std::env::remove_var("STUDIO_CONNECT_TIMEOUT_SECS");

    assert_eq!(config.api_base_url, "https://env.example.com");
    assert_eq!(config.connect_timeout, Duration::from_secs(9));
}

#[test]
#[serial]
fn test_runtime_file_beats_env() {
    std::env::set_var(API_BASE_URL_KEY, "https://env.example.com");

    let mut runtime = RuntimeValues::empty();
    runtime.insert(API_BASE_URL_KEY, "https://runtime.example.com");
    let config = StudioConfig::from_env(&runtime).unwrap();

    std::env::remove_var(API_BASE_URL_KEY);

    assert_eq!(config.api_base_url, "https://runtime.example.com");
}
