//! Domain model for the kanban workflow.
//!
//! Tasks move around a closed three-state cycle, are ordered per status
//! column, and may be blocked by one other task in the same project. All
//! persistence concerns stay outside this boundary.

pub mod dependency;
mod error;
mod ids;
pub mod ordering;
mod project;
mod status;
mod task;
mod text;

pub use dependency::DependencyIndex;
pub use error::{
    ParseTaskPriorityError, ParseTaskStatusError, ParseTaskTypeError, TaskDomainError, TextField,
};
pub use ids::{ProjectId, SequenceId, TaskId};
pub use project::{PersistedProjectData, Project, ProjectColor, ProjectDetails};
pub use status::{MoveDirection, TaskPriority, TaskStatus, TaskType};
pub use task::{PersistedTaskData, Task, TaskDetails};
pub use text::FieldLimits;
