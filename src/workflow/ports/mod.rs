//! Port contracts for workflow persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow
//! service. Both are synchronous: every call completes before returning.

pub mod project_repository;
pub mod task_repository;

pub use project_repository::{
    ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult,
};
pub use task_repository::{
    TaskChangeset, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskWrite,
};

#[cfg(test)]
pub use project_repository::MockProjectRepository;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
