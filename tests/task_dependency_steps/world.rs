//! Shared world state for task dependency scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::eyre;
use lanes::workflow::{
    adapters::sqlite::SqliteWorkflowStore,
    domain::{ProjectId, Task, TaskId},
    services::{StatusChange, WorkflowError, WorkflowService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the scenario world.
pub type TestWorkflowService =
    WorkflowService<SqliteWorkflowStore, SqliteWorkflowStore, DefaultClock>;

/// Scenario world backed by an in-memory `SQLite` store.
pub struct DependencyWorld {
    pub service: TestWorkflowService,
    pub project_id: Option<ProjectId>,
    pub tasks: HashMap<String, TaskId>,
    pub last_change: Option<StatusChange>,
    pub last_error: Option<WorkflowError>,
}

impl DependencyWorld {
    /// Creates a world with a fresh store.
    ///
    /// # Panics
    ///
    /// Panics when the in-memory database cannot be opened.
    #[must_use]
    pub fn new() -> Self {
        let store =
            Arc::new(SqliteWorkflowStore::in_memory().expect("in-memory store should open"));
        let service = WorkflowService::new(Arc::clone(&store), store, Arc::new(DefaultClock));
        Self {
            service,
            project_id: None,
            tasks: HashMap::new(),
            last_change: None,
            last_error: None,
        }
    }

    /// Returns the scenario project.
    pub fn project(&self) -> Result<ProjectId, eyre::Report> {
        self.project_id
            .ok_or_else(|| eyre!("missing project in scenario world"))
    }

    /// Resolves a task created earlier in the scenario.
    pub fn task_id(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no task named {name} in scenario world"))
    }

    /// Reloads a task by scenario name.
    pub fn reload(&self, name: &str) -> Result<Task, eyre::Report> {
        Ok(self.service.get_task(self.task_id(name)?)?)
    }
}

impl Default for DependencyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DependencyWorld {
    DependencyWorld::default()
}
