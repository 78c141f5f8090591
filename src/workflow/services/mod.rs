//! Service layer for the kanban workflow.

mod error;
mod requests;
mod workflow;

pub use error::{WorkflowError, WorkflowResult};
pub use requests::{
    CreateProjectRequest, CreateTaskRequest, DeletedTask, StatusChange, UpdateProjectRequest,
    UpdateTaskRequest,
};
pub use workflow::{WorkflowConfig, WorkflowService};
