//! Service-level errors for workflow operations.

use crate::workflow::{
    domain::{ProjectId, TaskDomainError, TaskId},
    ports::{ProjectRepositoryError, TaskRepositoryError},
};
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Errors returned by [`super::WorkflowService`].
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input failed validation. Nothing was written.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Storage failed while performing an operation.
    #[error("failed to {operation} {entity} {id}: {source}")]
    Persistence {
        /// Operation being performed, such as `store` or `move`.
        operation: &'static str,
        /// Entity kind, `task` or `project`.
        entity: &'static str,
        /// Identifier of the entity involved.
        id: String,
        /// Underlying repository failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl WorkflowError {
    /// Returns `true` for input validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` when a task or project was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_) | Self::ProjectNotFound(_))
    }

    /// Returns `true` for storage failures.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    fn persistence(
        operation: &'static str,
        entity: &'static str,
        id: String,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        warn!(operation, entity, id = %id, error = %source, "workflow write failed");
        Self::Persistence {
            operation,
            entity,
            id,
            source: Box::new(source),
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Attaches operation context to repository results.
pub(super) trait RepositoryContext<T> {
    fn context(self, operation: &'static str, id: impl fmt::Display) -> WorkflowResult<T>;
}

impl<T> RepositoryContext<T> for Result<T, TaskRepositoryError> {
    fn context(self, operation: &'static str, id: impl fmt::Display) -> WorkflowResult<T> {
        self.map_err(|err| match err {
            TaskRepositoryError::NotFound(task_id) => WorkflowError::TaskNotFound(task_id),
            other => WorkflowError::persistence(operation, "task", id.to_string(), other),
        })
    }
}

impl<T> RepositoryContext<T> for Result<T, ProjectRepositoryError> {
    fn context(self, operation: &'static str, id: impl fmt::Display) -> WorkflowResult<T> {
        self.map_err(|err| match err {
            ProjectRepositoryError::NotFound(project_id) => {
                WorkflowError::ProjectNotFound(project_id)
            }
            other => WorkflowError::persistence(operation, "project", id.to_string(), other),
        })
    }
}
