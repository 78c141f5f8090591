//! Task aggregate root.

use super::{
    MoveDirection, ProjectId, SequenceId, TaskDomainError, TaskId, TaskPriority, TaskStatus,
    TaskType,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// User-editable task fields, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Trimmed, non-empty task name.
    pub name: String,
    /// Trimmed description; empty when absent.
    pub description: String,
    /// Classification tag.
    pub task_type: TaskType,
    /// Priority used by the not-started ordering.
    pub priority: TaskPriority,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    sequence_id: SequenceId,
    project_id: ProjectId,
    name: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    task_type: TaskType,
    blocked_by: Option<SequenceId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted sequence identifier.
    pub sequence_id: SequenceId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted classification tag.
    pub task_type: TaskType,
    /// Persisted blocker reference, if any.
    pub blocked_by: Option<SequenceId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new not-started task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfBlocking`] when `blocked_by` names the
    /// task's own sequence identifier.
    pub fn new(
        project_id: ProjectId,
        sequence_id: SequenceId,
        details: TaskDetails,
        blocked_by: Option<SequenceId>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let id = TaskId::new();
        if blocked_by == Some(sequence_id) {
            return Err(TaskDomainError::SelfBlocking(id));
        }
        let timestamp = clock.utc();
        let TaskDetails {
            name,
            description,
            task_type,
            priority,
        } = details;

        Ok(Self {
            id,
            sequence_id,
            project_id,
            name,
            description,
            status: TaskStatus::NotStarted,
            priority,
            task_type,
            blocked_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            sequence_id: data.sequence_id,
            project_id: data.project_id,
            name: data.name,
            description: data.description,
            status: data.status,
            priority: data.priority,
            task_type: data.task_type,
            blocked_by: data.blocked_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the sequence identifier other tasks use to reference this one.
    #[must_use]
    pub const fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the classification tag.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the blocker's sequence identifier, if any.
    #[must_use]
    pub const fn blocked_by(&self) -> Option<SequenceId> {
        self.blocked_by
    }

    /// Returns `true` while a blocker is set.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked_by.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the editable fields. Status and blocker are untouched.
    pub fn edit(&mut self, details: TaskDetails, clock: &impl Clock) {
        let TaskDetails {
            name,
            description,
            task_type,
            priority,
        } = details;
        self.name = name;
        self.description = description;
        self.task_type = task_type;
        self.priority = priority;
        self.touch(clock);
    }

    /// Assigns or clears the manual blocker.
    ///
    /// Existence of the blocker within the project is checked by the caller
    /// against the project's task set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfBlocking`] when `blocker` is this task.
    pub fn set_blocked_by(
        &mut self,
        blocker: Option<SequenceId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if blocker == Some(self.sequence_id) {
            return Err(TaskDomainError::SelfBlocking(self.id));
        }
        self.blocked_by = blocker;
        self.touch(clock);
        Ok(())
    }

    /// Moves the task one step around the status cycle.
    ///
    /// Returns the new status.
    pub fn move_status(&mut self, direction: MoveDirection, clock: &impl Clock) -> TaskStatus {
        self.status = direction.apply(self.status);
        self.touch(clock);
        self.status
    }

    /// Copies the status and `updated_at` of `other`, leaving every other
    /// field as stored.
    pub const fn apply_status_from(&mut self, other: &Self) {
        self.status = other.status;
        self.updated_at = other.updated_at;
    }

    /// Clears the blocker if it is `blocker`.
    ///
    /// Returns `true` when the task was released.
    pub fn release_from(&mut self, blocker: SequenceId, at: DateTime<Utc>) -> bool {
        if self.blocked_by != Some(blocker) {
            return false;
        }
        self.blocked_by = None;
        self.updated_at = at;
        true
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
