//! Request and result payloads for the workflow service.

use crate::workflow::domain::{
    ProjectId, SequenceId, Task, TaskId, TaskPriority, TaskType,
};
use serde::Serialize;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) project_id: ProjectId,
    pub(super) name: String,
    pub(super) description: String,
    pub(super) priority: TaskPriority,
    pub(super) task_type: TaskType,
    pub(super) blocked_by: Option<SequenceId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: String::new(),
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            blocked_by: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the classification tag.
    #[must_use]
    pub const fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Blocks the new task on the task owning `blocker`.
    #[must_use]
    pub const fn blocked_by(mut self, blocker: SequenceId) -> Self {
        self.blocked_by = Some(blocker);
        self
    }
}

/// Request payload for editing a task.
///
/// Fields left unset keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub(super) id: TaskId,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
    pub(super) priority: Option<TaskPriority>,
    pub(super) task_type: Option<TaskType>,
}

impl UpdateTaskRequest {
    /// Creates an edit of task `id` that changes nothing yet.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            priority: None,
            task_type: None,
        }
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the classification tag.
    #[must_use]
    pub const fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }
}

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) color: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display colour as `#rrggbb`.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Request payload for editing a project.
///
/// Fields left unset keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    pub(super) id: ProjectId,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
    pub(super) color: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates an edit of project `id` that changes nothing yet.
    #[must_use]
    pub const fn new(id: ProjectId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            color: None,
        }
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the display colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Outcome of a status move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// The moved task as persisted.
    pub task: Task,
    /// Dependents whose blocker was cleared because the task reached Done.
    pub released: Vec<TaskId>,
}

/// Outcome of a task deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedTask {
    /// The task as it was before removal.
    pub task: Task,
    /// Dependents whose blocker was cleared by the deletion.
    pub released: Vec<TaskId>,
}
