//! Project listing: the full fetched set, client-side filtering and the
//! card actions (delete, preview, quick generate).

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};
use vstudio_client::{ProjectsApi, StudioResult};
use vstudio_models::catalog::LISTING_STATUS_FILTERS;
use vstudio_models::format::{format_date, format_date_time};
use vstudio_models::{
    AudioRequest, ImagesRequest, Project, ProjectStatus, ScriptRequest, Stage, VideoRequest,
};

use crate::busy::BusyFlags;
use crate::logging::ActionLogger;
use crate::outcome::{Outcome, SkipReason};

/// Status filter of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: &ProjectStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Only(status) => status.label(),
        }
    }

    /// Filter dropdown entries, "All Status" first.
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(StatusFilter::All)
            .chain(LISTING_STATUS_FILTERS.iter().cloned().map(StatusFilter::Only))
            .collect()
    }
}

/// Shown when the filtered list is empty.
pub const EMPTY_LISTING_MESSAGE: &str = "No projects found";

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Only(ProjectStatus::from(s)))
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// The displayed subset: status equality AND case-insensitive substring
/// of `query` in title or description. An empty query filters nothing.
pub fn filter_projects<'a>(
    projects: &'a [Project],
    status: &StatusFilter,
    query: &str,
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| status.matches(&p.status))
        .filter(|p| p.matches_query(query))
        .collect()
}

/// What a project card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub status_label: &'static str,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    /// `Updated: dd/mm/yyyy`
    pub updated: String,
    pub duration: Option<String>,
    /// Publication lines for scheduled or uploaded projects
    pub publication: Vec<String>,
    pub can_preview: bool,
}

impl ProjectCard {
    pub fn from_project(project: &Project) -> Self {
        let mut publication = Vec::new();
        if project.status.is_published() {
            if let Some(at) = project.youtube_scheduled_publish_at.as_deref() {
                publication.push(format!("Publication: {}", format_date_time(Some(at))));
            }
            if project.youtube_is_premiere {
                publication.push("Premiere mode".to_string());
            }
            if project.youtube_url.is_some() && project.status == ProjectStatus::UploadedToYoutube {
                publication.push("Live on YouTube".to_string());
            }
        }

        Self {
            id: project.id.clone().unwrap_or_default(),
            title: project.title.clone(),
            status_label: project.status.label(),
            description: Some(project.description.clone()).filter(|d| !d.is_empty()),
            thumbnail: project.thumbnail.clone(),
            updated: format!("Updated: {}", format_date(project.updated_at.as_deref())),
            duration: (project.duration > 0.0).then(|| format!("{}s", project.duration)),
            publication,
            can_preview: project.has_video(),
        }
    }
}

/// Content of the video preview modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPreview {
    pub title: String,
    pub video_url: String,
}

#[derive(Debug, Default)]
struct ListingState {
    projects: Vec<Project>,
    loaded: bool,
    status: StatusFilter,
    query: String,
    error: Option<String>,
}

/// Listing page state.
pub struct ProjectListing<A> {
    api: A,
    state: Mutex<ListingState>,
    busy: BusyFlags<(String, Stage)>,
}

impl<A> fmt::Debug for ProjectListing<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectListing")
            .field("state", &self.state)
            .field("busy", &self.busy)
            .finish()
    }
}

impl<A: ProjectsApi> ProjectListing<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(ListingState::default()),
            busy: BusyFlags::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch every project. On failure the previous list is kept.
    pub async fn refresh(&self) -> StudioResult<usize> {
        match self.api.list().await {
            Ok(projects) => {
                let count = projects.len();
                let mut state = self.lock();
                state.projects = projects;
                state.loaded = true;
                info!(count, "Loaded projects");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch projects, keeping previous list");
                self.lock().loaded = true;
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.lock().query = query.into();
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.lock().status = status;
    }

    /// Every fetched project.
    pub fn projects(&self) -> Vec<Project> {
        self.lock().projects.clone()
    }

    /// The filtered list, recomputed from the current inputs.
    pub fn visible(&self) -> Vec<Project> {
        let state = self.lock();
        filter_projects(&state.projects, &state.status, &state.query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn cards(&self) -> Vec<ProjectCard> {
        self.visible().iter().map(ProjectCard::from_project).collect()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    /// Preview modal content, when the project has a rendered video.
    pub fn preview(&self, id: &str) -> Option<VideoPreview> {
        let state = self.lock();
        let project = state.projects.iter().find(|p| p.id.as_deref() == Some(id))?;
        let video_url = project.video_url.clone().filter(|u| !u.is_empty())?;
        Some(VideoPreview {
            title: project.title.clone(),
            video_url,
        })
    }

    /// Delete on the server, then drop the project locally.
    pub async fn delete(&self, id: &str) -> Outcome {
        let logger = ActionLogger::new(id, "delete_project");
        match self.api.delete(id).await {
            Ok(()) => {
                let mut state = self.lock();
                state.projects.retain(|p| p.id.as_deref() != Some(id));
                state.error = None;
                logger.log_completion("removed from listing");
                Outcome::Done("Project deleted".to_string())
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                let message = e.user_message("Failed to delete project");
                self.lock().error = Some(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    pub fn is_generating(&self, id: &str, stage: Stage) -> bool {
        self.busy.is_busy(&(id.to_string(), stage))
    }

    /// Card shortcut: run one stage for a listed project.
    ///
    /// On success the listed project is replaced by the response.
    pub async fn quick_generate(&self, id: &str, stage: Stage) -> Outcome {
        let Some(_guard) = self.busy.try_begin((id.to_string(), stage)) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        let project = {
            let state = self.lock();
            state.projects.iter().find(|p| p.id.as_deref() == Some(id)).cloned()
        };
        let Some(project) = project else {
            return Outcome::Skipped(SkipReason::Blocked("Project is not in the listing"));
        };

        let logger = ActionLogger::new(id, &format!("quick_generate_{}", stage));
        logger.log_start("card action");

        let result = match stage {
            Stage::Script => {
                self.api
                    .generate_script(id, &ScriptRequest::from_project(&project))
                    .await
            }
            Stage::Audio => {
                self.api
                    .generate_audio(id, &AudioRequest::from_project(&project))
                    .await
            }
            Stage::Images => {
                self.api
                    .generate_images(id, &ImagesRequest::from_project(&project))
                    .await
            }
            Stage::Video => {
                self.api
                    .generate_video(id, &VideoRequest::from_project(&project))
                    .await
            }
        };

        match result {
            Ok(mut updated) => {
                if updated.id.is_none() {
                    updated.id = Some(id.to_string());
                }
                let mut state = self.lock();
                if let Some(slot) = state.projects.iter_mut().find(|p| p.id.as_deref() == Some(id)) {
                    *slot = updated;
                }
                logger.log_completion("listing updated");
                Outcome::Done(format!("{} generation started!", capitalize(stage.as_str())))
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                let message = e.user_message(&format!("Failed to generate {}", stage));
                self.lock().error = Some(message.clone());
                Outcome::Failed(message)
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
