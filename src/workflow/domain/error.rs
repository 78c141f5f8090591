//! Error types for workflow domain validation and parsing.

use super::{ProjectId, SequenceId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A name is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyName {
        /// The field being validated.
        field: TextField,
    },

    /// A name or description exceeds its character limit.
    #[error("{field} exceeds {limit} character limit ({actual} characters)")]
    TooLong {
        /// The field being validated.
        field: TextField,
        /// Maximum allowed characters.
        limit: usize,
        /// Actual character count.
        actual: usize,
    },

    /// The project colour is not a `#rrggbb` hex value.
    #[error("invalid project color '{0}', expected #rrggbb")]
    InvalidColor(String),

    /// The sequence identifier is not a positive 32-bit integer.
    #[error("invalid sequence identifier {0}, expected a positive integer")]
    InvalidSequenceId(i64),

    /// A task cannot block itself.
    #[error("task {0} cannot block itself")]
    SelfBlocking(TaskId),

    /// The referenced blocker does not exist in the task's project.
    #[error("no task with sequence {0} exists in this project")]
    UnknownBlocker(SequenceId),

    /// The referenced project does not exist.
    #[error("no project with id {0} exists")]
    UnknownProject(ProjectId),
}

impl TaskDomainError {
    /// Returns the text field a validation error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<TextField> {
        match self {
            Self::EmptyName { field } | Self::TooLong { field, .. } => Some(*field),
            Self::InvalidColor(_) => Some(TextField::ProjectColor),
            Self::InvalidSequenceId(_) | Self::SelfBlocking(_) | Self::UnknownBlocker(_) => {
                Some(TextField::BlockedBy)
            }
            Self::UnknownProject(_) => Some(TextField::Project),
        }
    }
}

/// User-editable fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Task name.
    TaskName,
    /// Task description.
    TaskDescription,
    /// Project name.
    ProjectName,
    /// Project description.
    ProjectDescription,
    /// Project colour.
    ProjectColor,
    /// Task blocker reference.
    BlockedBy,
    /// Owning project reference.
    Project,
}

impl TextField {
    /// Returns the human-readable field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TaskName => "task name",
            Self::TaskDescription => "task description",
            Self::ProjectName => "project name",
            Self::ProjectDescription => "project description",
            Self::ProjectColor => "project color",
            Self::BlockedBy => "blocked by",
            Self::Project => "project",
        }
    }
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing task types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);
