//! Shared fixtures for `SQLite` integration tests.

use chrono::{DateTime, TimeZone, Utc};
use lanes::workflow::{
    adapters::sqlite::SqliteWorkflowStore,
    domain::{
        PersistedProjectData, PersistedTaskData, Project, ProjectColor, ProjectId, SequenceId,
        Task, TaskId, TaskPriority, TaskStatus, TaskType,
    },
    ports::ProjectRepository,
};
use rstest::fixture;

/// Provides a fresh in-memory store.
///
/// # Panics
///
/// Panics when `SQLite` cannot be initialized.
#[fixture]
pub fn store() -> SqliteWorkflowStore {
    SqliteWorkflowStore::in_memory().expect("in-memory store should open")
}

/// Returns a fixed timestamp `secs` seconds after the epoch.
///
/// # Panics
///
/// Panics when `secs` is outside the supported range.
#[must_use]
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .expect("timestamp should be valid")
}

/// Returns a sequence identifier.
///
/// # Panics
///
/// Panics when `value` is zero.
#[must_use]
pub fn seq(value: u32) -> SequenceId {
    SequenceId::new(value).expect("sequence should be positive")
}

/// Builds a project with fixed timestamps.
#[must_use]
pub fn project(name: &str, created_secs: i64) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(),
        name: name.to_owned(),
        description: String::new(),
        color: ProjectColor::default(),
        created_at: at(created_secs),
        updated_at: at(created_secs),
    })
}

/// Stores a new project and returns it.
///
/// # Errors
///
/// Returns an error when the store rejects the project.
pub fn stored_project(store: &SqliteWorkflowStore, name: &str) -> eyre::Result<Project> {
    let created = project(name, 0);
    ProjectRepository::store(store, &created)?;
    Ok(created)
}

/// Builder for tasks with explicit ordering attributes.
pub struct TaskSpec {
    data: PersistedTaskData,
}

impl TaskSpec {
    /// Starts a not-started, low-priority task created at the epoch.
    #[must_use]
    pub fn new(project_id: ProjectId, sequence: u32) -> Self {
        Self {
            data: PersistedTaskData {
                id: TaskId::new(),
                sequence_id: seq(sequence),
                project_id,
                name: format!("task {sequence}"),
                description: String::new(),
                status: TaskStatus::NotStarted,
                priority: TaskPriority::Low,
                task_type: TaskType::Regular,
                blocked_by: None,
                created_at: at(0),
                updated_at: at(0),
            },
        }
    }

    /// Reuses an existing identifier.
    #[must_use]
    pub const fn id(mut self, id: TaskId) -> Self {
        self.data.id = id;
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.data.name = name.to_owned();
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.data.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.data.priority = priority;
        self
    }

    /// Sets `created_at`.
    #[must_use]
    pub fn created(mut self, secs: i64) -> Self {
        self.data.created_at = at(secs);
        self
    }

    /// Sets `updated_at`.
    #[must_use]
    pub fn updated(mut self, secs: i64) -> Self {
        self.data.updated_at = at(secs);
        self
    }

    /// Sets the blocker.
    #[must_use]
    pub fn blocked_by(mut self, blocker: u32) -> Self {
        self.data.blocked_by = Some(seq(blocker));
        self
    }

    /// Builds the task.
    #[must_use]
    pub fn build(self) -> Task {
        Task::from_persisted(self.data)
    }
}

/// Returns the sequence numbers of `tasks` in order.
#[must_use]
pub fn sequences(tasks: &[Task]) -> Vec<u32> {
    tasks.iter().map(|task| task.sequence_id().value()).collect()
}
