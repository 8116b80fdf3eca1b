//! Headless application state for the video studio.
//!
//! This crate provides:
//! - The project editor session (draft, tabs, stage generation, save)
//! - The project listing with filtering and card actions
//! - The YouTube connection and publishing panels
//! - Routes and static pages of the application shell
//!
//! All state is in memory and per session. Every user action returns an
//! [`Outcome`]; a second trigger of an action that is still pending is a
//! no-op.

pub mod busy;
pub mod connection;
pub mod draft;
pub mod editor;
pub mod listing;
pub mod logging;
pub mod outcome;
pub mod preview;
pub mod publish;
pub mod shell;

#[cfg(test)]
mod testing;

pub use busy::{BusyFlags, BusyGuard};
pub use connection::{AuthCallback, ConnectionPanel};
pub use draft::{
    AudioChange, DetailsChange, Draft, DraftError, DraftUpdate, ImagesChange, ScriptChange,
    VideoChange,
};
pub use editor::{EditorHeader, EditorOp, EditorSession, GenerateTarget, ProjectRef, Tab};
pub use listing::{filter_projects, ProjectCard, ProjectListing, StatusFilter, VideoPreview};
pub use logging::ActionLogger;
pub use outcome::{Availability, Outcome, SkipReason};
pub use preview::{preview_for, TabPreview};
pub use publish::{
    PublishMode, PublishOp, PublishOutcome, PublishPanel, Readiness, ScheduleForm,
    ScheduleFormError,
};
pub use shell::Route;
