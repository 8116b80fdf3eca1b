//! Structured action logging.
//!
//! Provides consistent lifecycle lines for user actions (save, generate,
//! upload, schedule) with the project id and operation attached.

use tracing::{error, info, warn, Span};

/// Logger for one user action on one project.
#[derive(Debug, Clone)]
pub struct ActionLogger {
    project_id: String,
    operation: String,
}

impl ActionLogger {
    /// Create a logger for `operation` on `project_id`.
    ///
    /// Unsaved drafts log under their route placeholder.
    pub fn new(project_id: &str, operation: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            project_id = %self.project_id,
            operation = %self.operation,
            "Action started: {}", message
        );
    }

    pub fn log_skipped(&self, reason: &str) {
        info!(
            project_id = %self.project_id,
            operation = %self.operation,
            "Action skipped: {}", reason
        );
    }

    /// A tolerated failure that does not fail the action.
    pub fn log_warning(&self, message: &str) {
        warn!(
            project_id = %self.project_id,
            operation = %self.operation,
            "Action warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            project_id = %self.project_id,
            operation = %self.operation,
            "Action failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            project_id = %self.project_id,
            operation = %self.operation,
            "Action completed: {}", message
        );
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// A span carrying this action's context.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "studio_action",
            project_id = %self.project_id,
            operation = %self.operation
        )
    }
}
