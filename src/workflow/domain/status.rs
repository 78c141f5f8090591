//! Task status state machine and classification enums.

use super::{ParseTaskPriorityError, ParseTaskStatusError, ParseTaskTypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kanban workflow status.
///
/// The three states form a closed cycle: `next` walks
/// `NotStarted → InProgress → Done → NotStarted` and `previous` walks it in
/// reverse. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started. Initial state for new tasks.
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is complete.
    Done,
}

impl TaskStatus {
    /// All statuses in kanban column order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Done];

    /// Returns the status one step forward in the cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::NotStarted,
        }
    }

    /// Returns the status one step backward in the cycle.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::NotStarted => Self::Done,
            Self::InProgress => Self::NotStarted,
            Self::Done => Self::InProgress,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the column heading shown on a board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Returns the zero-based column position on a board.
    #[must_use]
    pub const fn column(self) -> usize {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a status move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Apply [`TaskStatus::next`].
    Forward,
    /// Apply [`TaskStatus::previous`].
    Backward,
}

impl MoveDirection {
    /// Applies this direction to a status.
    #[must_use]
    pub const fn apply(self, status: TaskStatus) -> TaskStatus {
        match self {
            Self::Forward => status.next(),
            Self::Backward => status.previous(),
        }
    }
}

/// Task priority. Higher priorities sort first in the not-started column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Default priority.
    #[default]
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Returns the numeric rank persisted for SQL ordering.
    #[must_use]
    pub const fn rank(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Reconstructs a priority from its persisted rank.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskPriorityError`] for ranks outside `0..=2`.
    pub fn from_rank(rank: i32) -> Result<Self, ParseTaskPriorityError> {
        match rank {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(ParseTaskPriorityError(other.to_string())),
        }
    }

    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tag. Has no effect on workflow rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Ordinary work item.
    #[default]
    Regular,
    /// Defect.
    Bug,
    /// New functionality.
    Feature,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(ParseTaskTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
