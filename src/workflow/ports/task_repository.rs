//! Repository port for task persistence and status queries.

use crate::workflow::domain::{ProjectId, SequenceId, Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// One step of a [`TaskChangeset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWrite {
    /// Persists the status and `updated_at` of an existing task.
    Status(Task),
    /// Clears `blocked_by` on every task of `project_id` that references
    /// `blocker`, setting their `updated_at` to `at`. Matching nothing is
    /// not an error.
    ReleaseDependents {
        /// Project whose tasks are scanned.
        project_id: ProjectId,
        /// Sequence identifier of the blocker being released.
        blocker: SequenceId,
        /// Timestamp written to each released task.
        at: DateTime<Utc>,
    },
    /// Removes an existing task.
    Delete(TaskId),
}

/// Ordered writes that a repository applies all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChangeset {
    writes: Vec<TaskWrite>,
}

impl TaskChangeset {
    /// Creates an empty changeset.
    #[must_use]
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Appends a write.
    #[must_use]
    pub fn with(mut self, write: TaskWrite) -> Self {
        self.writes.push(write);
        self
    }

    /// Returns the writes in application order.
    #[must_use]
    pub fn writes(&self) -> &[TaskWrite] {
        &self.writes
    }

    /// Returns `true` when there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Task persistence contract.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository: Send + Sync {
    /// Allocates the next sequence identifier. Identifiers are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::SequenceExhausted`] when no identifier
    /// remains, or a persistence error.
    fn next_sequence_id(&self) -> TaskRepositoryResult<SequenceId>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::DuplicateSequence`] when the sequence
    /// identifier is taken.
    fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists every field of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task of a project in ascending sequence order.
    fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns a project's tasks with the given status in column order.
    ///
    /// Implementations must order results exactly as
    /// [`crate::workflow::domain::ordering::sort_for_status`] does.
    fn find_by_status(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies every write in `changeset`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when a status or delete
    /// write targets a missing task, or a persistence error. Storage is left
    /// unchanged on error.
    fn apply(&self, changeset: &TaskChangeset) -> TaskRepositoryResult<()>;

    /// Persists the status and `updated_at` of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn update_status(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.apply(&TaskChangeset::new().with(TaskWrite::Status(task.clone())))
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.apply(&TaskChangeset::new().with(TaskWrite::Delete(id)))
    }

    /// Clears `blocked_by` on every task of a project that references
    /// `blocker`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the bulk update fails.
    fn clear_blocked_by(
        &self,
        project_id: ProjectId,
        blocker: SequenceId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        self.apply(&TaskChangeset::new().with(TaskWrite::ReleaseDependents {
            project_id,
            blocker,
            at,
        }))
    }
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task with the same sequence identifier already exists.
    #[error("duplicate sequence identifier: {0}")]
    DuplicateSequence(SequenceId),

    /// No further sequence identifiers can be allocated.
    #[error("task sequence identifiers exhausted")]
    SequenceExhausted,

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
