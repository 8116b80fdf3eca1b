//! Editor session: one project draft, its tabs and its stage actions.
//!
//! The session owns the draft behind a short-lived lock that is never held
//! across an await. Each action takes its own busy flag, so a second
//! trigger of the same action while the first is pending does nothing,
//! while other actions stay usable.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Map, Value};
use vstudio_client::{ProjectsApi, StudioError, StudioResult};
use vstudio_models::format::format_time;
use vstudio_models::{
    AudioRequest, DescriptionRequest, ImagesRequest, Project, SceneImageRequest, ScriptRequest,
    Stage, VideoRequest,
};

use crate::busy::BusyFlags;
use crate::draft::{Draft, DraftError, DraftUpdate};
use crate::logging::ActionLogger;
use crate::outcome::{Availability, Outcome, SkipReason};

/// Which record the editor is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// Never saved; the first save creates it.
    New,
    Saved(String),
}

impl ProjectRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            ProjectRef::New => None,
            ProjectRef::Saved(id) => Some(id),
        }
    }
}

/// Editor tabs, one per production stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Script,
    Audio,
    Images,
    Video,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Script, Tab::Audio, Tab::Images, Tab::Video];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Script => "script",
            Tab::Audio => "audio",
            Tab::Images => "images",
            Tab::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Script => "Script",
            Tab::Audio => "Audio",
            Tab::Images => "Images",
            Tab::Video => "Video",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tab: {}", s))
    }
}

/// What a generate action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerateTarget {
    Script,
    Audio,
    Images,
    /// One scene of the images stage.
    SceneImage(usize),
    Video,
}

impl From<Stage> for GenerateTarget {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Script => GenerateTarget::Script,
            Stage::Audio => GenerateTarget::Audio,
            Stage::Images => GenerateTarget::Images,
            Stage::Video => GenerateTarget::Video,
        }
    }
}

/// Editor actions, each with its own busy flag and error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorOp {
    Save,
    Generate(GenerateTarget),
    Description,
}

impl EditorOp {
    pub fn name(&self) -> &'static str {
        match self {
            EditorOp::Save => "save_project",
            EditorOp::Generate(GenerateTarget::Script) => "generate_script",
            EditorOp::Generate(GenerateTarget::Audio) => "generate_audio",
            EditorOp::Generate(GenerateTarget::Images) => "generate_images",
            EditorOp::Generate(GenerateTarget::SceneImage(_)) => "generate_scene_image",
            EditorOp::Generate(GenerateTarget::Video) => "generate_video",
            EditorOp::Description => "generate_description",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            EditorOp::Save => "Failed to save project",
            EditorOp::Generate(GenerateTarget::Script) => "Failed to generate script",
            EditorOp::Generate(GenerateTarget::Audio) => "Failed to generate audio",
            EditorOp::Generate(GenerateTarget::Images) => "Failed to generate images",
            EditorOp::Generate(GenerateTarget::SceneImage(_)) => "Failed to generate image",
            EditorOp::Generate(GenerateTarget::Video) => "Failed to render video",
            EditorOp::Description => "Failed to generate description",
        }
    }

    fn success_message(&self) -> String {
        match self {
            EditorOp::Save => "Project saved successfully!".to_string(),
            EditorOp::Generate(GenerateTarget::Script) => "Script generated successfully!".to_string(),
            EditorOp::Generate(GenerateTarget::Audio) => "Audio generated successfully!".to_string(),
            EditorOp::Generate(GenerateTarget::Images) => "Images generated successfully!".to_string(),
            EditorOp::Generate(GenerateTarget::SceneImage(index)) => {
                format!("Image for scene {} generated successfully!", index + 1)
            }
            EditorOp::Generate(GenerateTarget::Video) => "Video rendered successfully!".to_string(),
            EditorOp::Description => "Description generated successfully!".to_string(),
        }
    }
}

/// Header line of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorHeader {
    pub title: String,
    pub status_label: &'static str,
    /// `Last saved: HH:MM:SS`, once there is a save time
    pub last_saved: Option<String>,
}

#[derive(Debug)]
struct EditorState {
    reference: ProjectRef,
    draft: Draft,
    active_tab: Tab,
    last_saved: Option<String>,
    errors: HashMap<EditorOp, String>,
}

/// State of one open editor.
pub struct EditorSession<A> {
    api: A,
    state: Mutex<EditorState>,
    busy: BusyFlags<EditorOp>,
}

impl<A> fmt::Debug for EditorSession<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &self.state)
            .field("busy", &self.busy)
            .finish()
    }
}

impl<A: ProjectsApi> EditorSession<A> {
    fn with_state(api: A, reference: ProjectRef, project: Project, last_saved: Option<String>) -> Self {
        Self {
            api,
            state: Mutex::new(EditorState {
                reference,
                draft: Draft::new(project),
                active_tab: Tab::default(),
                last_saved,
                errors: HashMap::new(),
            }),
            busy: BusyFlags::new(),
        }
    }

    /// Start a new, unsaved project with the editor defaults.
    pub fn new_project(api: A) -> Self {
        Self::with_state(api, ProjectRef::New, Project::new_draft(), None)
    }

    /// Load an existing project.
    ///
    /// A load failure is returned to the caller, which leaves the editor.
    pub async fn open(api: A, id: &str) -> StudioResult<Self> {
        let logger = ActionLogger::new(id, "load_project");
        let project = match api.get(id).await {
            Ok(project) => project,
            Err(e) => {
                logger.log_error(&e.to_string());
                return Err(e);
            }
        };
        let last_saved = project.updated_at.clone();
        Ok(Self::with_state(
            api,
            ProjectRef::Saved(id.to_string()),
            project,
            last_saved,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Read side
    // =========================================================================

    /// Copy of the current draft.
    pub fn snapshot(&self) -> Project {
        self.lock().draft.project().clone()
    }

    pub fn reference(&self) -> ProjectRef {
        self.lock().reference.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().draft.is_dirty()
    }

    pub fn last_saved(&self) -> Option<String> {
        self.lock().last_saved.clone()
    }

    pub fn header(&self) -> EditorHeader {
        let state = self.lock();
        let project = state.draft.project();
        EditorHeader {
            title: project.title.clone(),
            status_label: project.status.label(),
            last_saved: state
                .last_saved
                .as_deref()
                .map(|ts| format!("Last saved: {}", format_time(Some(ts)))),
        }
    }

    pub fn tabs(&self) -> [Tab; 4] {
        Tab::ALL
    }

    pub fn active_tab(&self) -> Tab {
        self.lock().active_tab
    }

    pub fn set_active_tab(&self, tab: Tab) {
        self.lock().active_tab = tab;
    }

    pub fn is_busy(&self, op: EditorOp) -> bool {
        self.busy.is_busy(&op)
    }

    /// Inline error currently shown for `op`.
    pub fn error(&self, op: EditorOp) -> Option<String> {
        self.lock().errors.get(&op).cloned()
    }

    pub fn errors(&self) -> Vec<(EditorOp, String)> {
        self.lock()
            .errors
            .iter()
            .map(|(op, msg)| (*op, msg.clone()))
            .collect()
    }

    pub fn dismiss_error(&self, op: EditorOp) {
        self.lock().errors.remove(&op);
    }

    /// Whether the control for `op` is enabled.
    pub fn availability(&self, op: EditorOp) -> Availability {
        if self.busy.is_busy(&op) {
            return Availability::Busy;
        }

        let state = self.lock();
        let project = state.draft.project();
        match op {
            EditorOp::Save | EditorOp::Description => Availability::Enabled,
            EditorOp::Generate(GenerateTarget::Script) => Availability::Enabled,
            EditorOp::Generate(GenerateTarget::Audio) => {
                if project.has_script() {
                    Availability::Enabled
                } else {
                    Availability::Blocked("Generate a script first")
                }
            }
            EditorOp::Generate(GenerateTarget::Images) => {
                if project.images.is_empty() {
                    Availability::Blocked("Add at least one scene")
                } else {
                    Availability::Enabled
                }
            }
            EditorOp::Generate(GenerateTarget::SceneImage(index)) => {
                if self.busy.is_busy(&EditorOp::Generate(GenerateTarget::Images)) {
                    return Availability::Blocked("Image batch generation is running");
                }
                match project.images.get(index) {
                    None => Availability::Blocked("Scene does not exist"),
                    Some(scene) if !scene.has_prompt() => {
                        Availability::Blocked("Enter a prompt for this scene")
                    }
                    Some(_) => Availability::Enabled,
                }
            }
            EditorOp::Generate(GenerateTarget::Video) => {
                if !project.has_script() {
                    Availability::Blocked("Generate a script first")
                } else if !project.has_audio() {
                    Availability::Blocked("Generate audio first")
                } else {
                    Availability::Enabled
                }
            }
        }
    }

    // =========================================================================
    // Local edits
    // =========================================================================

    pub fn apply(&self, update: DraftUpdate) -> Result<(), DraftError> {
        self.lock().draft.apply(update)
    }

    pub fn apply_change(&self, partial: Map<String, Value>) -> Result<(), DraftError> {
        self.lock().draft.apply_change(partial)
    }

    // =========================================================================
    // Server actions
    // =========================================================================

    fn fail(&self, op: EditorOp, logger: &ActionLogger, err: &StudioError) -> Outcome {
        logger.log_error(&err.to_string());
        let message = err.user_message(op.failure_message());
        self.lock().errors.insert(op, message.clone());
        Outcome::Failed(message)
    }

    /// Create or update the project on the server.
    ///
    /// On success the draft becomes the server's copy; on failure it is
    /// left as is.
    pub async fn save(&self) -> Outcome {
        let op = EditorOp::Save;
        let Some(_guard) = self.busy.try_begin(op) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        let (reference, project) = {
            let mut state = self.lock();
            state.errors.remove(&op);
            (state.reference.clone(), state.draft.project().clone())
        };
        let logger = ActionLogger::new(project.route_id(), op.name());
        logger.log_start("saving draft");

        let result = match &reference {
            ProjectRef::New => self.api.create(&project).await,
            ProjectRef::Saved(id) => self.api.update(id, &project).await,
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => return self.fail(op, &logger, &e),
        };

        let Some(new_id) = saved.id.clone().or_else(|| reference.id().map(str::to_string)) else {
            let err = StudioError::invalid_response("saved project has no id");
            return self.fail(op, &logger, &err);
        };

        {
            let mut state = self.lock();
            state.reference = ProjectRef::Saved(new_id.clone());
            state.last_saved = Some(Utc::now().to_rfc3339());
            // Replace never fails
            let _ = state.draft.apply(DraftUpdate::Replace(saved));
        }

        logger.log_completion(&format!("saved as {}", new_id));
        Outcome::Done(op.success_message())
    }

    /// Run one stage generation against the current draft.
    pub async fn generate(&self, target: GenerateTarget) -> Outcome {
        let op = EditorOp::Generate(target);
        if let Some(skipped) = Outcome::from_availability(self.availability(op)) {
            return skipped;
        }
        let Some(_guard) = self.busy.try_begin(op) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        let project = {
            let mut state = self.lock();
            state.errors.remove(&op);
            state.draft.project().clone()
        };
        let route_id = project.route_id().to_string();
        let logger = ActionLogger::new(&route_id, op.name());
        logger.log_start("sending stage request");

        let api = &self.api;
        let result = match target {
            GenerateTarget::Script => api
                .generate_script(&route_id, &ScriptRequest::from_project(&project))
                .await
                .map(|r| DraftUpdate::from_stage_result(Stage::Script, r)),
            GenerateTarget::Audio => api
                .generate_audio(&route_id, &AudioRequest::from_project(&project))
                .await
                .map(|r| DraftUpdate::from_stage_result(Stage::Audio, r)),
            GenerateTarget::Images => api
                .generate_images(&route_id, &ImagesRequest::from_project(&project))
                .await
                .map(|r| DraftUpdate::from_stage_result(Stage::Images, r)),
            GenerateTarget::SceneImage(index) => {
                let Some(request) = SceneImageRequest::from_project(&project, index) else {
                    return Outcome::Skipped(SkipReason::Blocked("Scene does not exist"));
                };
                api.generate_scene_image(&route_id, index, &request)
                    .await
                    .map(|r| DraftUpdate::SceneImageGenerated {
                        index,
                        url: r.image_url,
                    })
            }
            GenerateTarget::Video => api
                .generate_video(&route_id, &VideoRequest::from_project(&project))
                .await
                .map(|r| DraftUpdate::from_stage_result(Stage::Video, r)),
        };

        self.merge_result(op, &logger, result)
    }

    /// Generate the YouTube description from the current details.
    pub async fn generate_description(&self) -> Outcome {
        let op = EditorOp::Description;
        let Some(_guard) = self.busy.try_begin(op) else {
            return Outcome::Skipped(SkipReason::Busy);
        };

        let project = {
            let mut state = self.lock();
            state.errors.remove(&op);
            state.draft.project().clone()
        };
        let logger = ActionLogger::new(project.route_id(), op.name());
        logger.log_start("requesting description");

        let result = self
            .api
            .generate_description(&DescriptionRequest::from_project(&project))
            .await
            .map(|r| DraftUpdate::DescriptionGenerated(r.description));

        self.merge_result(op, &logger, result)
    }

    fn merge_result(
        &self,
        op: EditorOp,
        logger: &ActionLogger,
        result: StudioResult<DraftUpdate>,
    ) -> Outcome {
        let update = match result {
            Ok(update) => update,
            Err(e) => return self.fail(op, logger, &e),
        };

        let applied = self.lock().draft.apply(update);
        match applied {
            Ok(()) => {
                logger.log_completion("merged into draft");
                Outcome::Done(op.success_message())
            }
            Err(e) => {
                // The scene was removed while its image was generating
                logger.log_warning(&e.to_string());
                let message = e.to_string();
                self.lock().errors.insert(op, message.clone());
                Outcome::Failed(message)
            }
        }
    }
}
