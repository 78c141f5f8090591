//! Workflow orchestration over the task and project repositories.

use super::{
    error::{RepositoryContext, WorkflowError, WorkflowResult},
    requests::{
        CreateProjectRequest, CreateTaskRequest, DeletedTask, StatusChange, UpdateProjectRequest,
        UpdateTaskRequest,
    },
};
use crate::board::Board;
use crate::workflow::{
    domain::{
        DependencyIndex, FieldLimits, MoveDirection, Project, ProjectColor, ProjectDetails,
        ProjectId, SequenceId, Task, TaskDetails, TaskDomainError, TaskId, TaskStatus, TextField,
        dependency,
    },
    ports::{ProjectRepository, TaskChangeset, TaskRepository, TaskWrite},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Tunables applied by the workflow service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Text length limits for names and descriptions.
    pub limits: FieldLimits,
}

impl WorkflowConfig {
    /// Creates a configuration with the given limits.
    #[must_use]
    pub const fn new(limits: FieldLimits) -> Self {
        Self { limits }
    }
}

/// Kanban workflow service.
///
/// Every operation completes its writes before returning. Operations that
/// touch more than one task submit a single [`TaskChangeset`], so a move to
/// Done and the release of its dependents either both persist or neither
/// does.
#[derive(Clone)]
pub struct WorkflowService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
    config: WorkflowConfig,
}

impl<T, P, C> WorkflowService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with default limits.
    #[must_use]
    pub fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self::with_config(tasks, projects, clock, WorkflowConfig::default())
    }

    /// Creates a service with explicit configuration.
    #[must_use]
    pub const fn with_config(
        tasks: Arc<T>,
        projects: Arc<P>,
        clock: Arc<C>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            tasks,
            projects,
            clock,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Creates a not-started task in a project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] for an invalid name, description,
    /// project or blocker, or [`WorkflowError::Persistence`] when storage
    /// fails.
    pub fn create_task(&self, request: CreateTaskRequest) -> WorkflowResult<Task> {
        let CreateTaskRequest {
            project_id,
            name,
            description,
            priority,
            task_type,
            blocked_by,
        } = request;
        let limits = &self.config.limits;
        let details = TaskDetails {
            name: limits.name(TextField::TaskName, &name)?,
            description: limits.description(TextField::TaskDescription, &description)?,
            task_type,
            priority,
        };
        let project = self
            .projects
            .find_by_id(project_id)
            .context("load", project_id)?
            .ok_or(TaskDomainError::UnknownProject(project_id))?;
        if let Some(blocker) = blocked_by {
            self.dependency_index(project.id())?
                .validate_blocker(None, blocker)?;
        }

        let sequence_id = self
            .tasks
            .next_sequence_id()
            .context("allocate sequence for", project.id())?;
        let task = Task::new(
            project.id(),
            sequence_id,
            details,
            blocked_by,
            &*self.clock,
        )?;
        self.tasks.store(&task).context("store", task.id())?;
        info!(
            task_id = %task.id(),
            sequence_id = %task.sequence_id(),
            project_id = %project.id(),
            "created task"
        );
        Ok(task)
    }

    /// Edits a task's name, description, type and priority.
    ///
    /// Status and blocker are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] for invalid text,
    /// [`WorkflowError::TaskNotFound`] when the task is missing, or
    /// [`WorkflowError::Persistence`] when storage fails.
    pub fn update_task(&self, request: UpdateTaskRequest) -> WorkflowResult<Task> {
        let mut task = self.get_task(request.id)?;
        let limits = &self.config.limits;
        let details = TaskDetails {
            name: request
                .name
                .map(|name| limits.name(TextField::TaskName, &name))
                .transpose()?
                .unwrap_or_else(|| task.name().to_owned()),
            description: request
                .description
                .map(|description| limits.description(TextField::TaskDescription, &description))
                .transpose()?
                .unwrap_or_else(|| task.description().to_owned()),
            task_type: request.task_type.unwrap_or(task.task_type()),
            priority: request.priority.unwrap_or(task.priority()),
        };
        task.edit(details, &*self.clock);
        self.tasks.update(&task).context("update", task.id())?;
        info!(task_id = %task.id(), "updated task");
        Ok(task)
    }

    /// Assigns or clears a task's manual blocker.
    ///
    /// Assigning a blocker never releases anything, even when the blocker
    /// is already Done.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] when the blocker is unknown in
    /// the project or is the task itself, [`WorkflowError::TaskNotFound`]
    /// when the task is missing, or [`WorkflowError::Persistence`].
    pub fn set_blocked_by(&self, id: TaskId, blocker: Option<SequenceId>) -> WorkflowResult<Task> {
        let mut task = self.get_task(id)?;
        if let Some(sequence_id) = blocker {
            self.dependency_index(task.project_id())?
                .validate_blocker(Some(id), sequence_id)?;
        }
        task.set_blocked_by(blocker, &*self.clock)?;
        self.tasks.update(&task).context("update blocker of", id)?;
        info!(task_id = %id, blocked_by = ?blocker.map(SequenceId::value), "set blocker");
        Ok(task)
    }

    /// Moves a task one step forward around the status cycle.
    ///
    /// # Errors
    ///
    /// See [`Self::move_task`].
    pub fn move_to_next_status(&self, id: TaskId) -> WorkflowResult<Task> {
        self.move_task(id, MoveDirection::Forward)
            .map(|change| change.task)
    }

    /// Moves a task one step backward around the status cycle.
    ///
    /// # Errors
    ///
    /// See [`Self::move_task`].
    pub fn move_to_previous_status(&self, id: TaskId) -> WorkflowResult<Task> {
        self.move_task(id, MoveDirection::Backward)
            .map(|change| change.task)
    }

    /// Moves a task one step around the status cycle.
    ///
    /// When the task lands on Done, its direct dependents are released in
    /// the same changeset. Dependents of those dependents are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when the task is missing, or
    /// [`WorkflowError::Persistence`] when the changeset fails, in which case
    /// nothing was written.
    pub fn move_task(&self, id: TaskId, direction: MoveDirection) -> WorkflowResult<StatusChange> {
        let mut task = self.get_task(id)?;
        let from = task.status();
        let to = task.move_status(direction, &*self.clock);
        let mut changeset = TaskChangeset::new().with(TaskWrite::Status(task.clone()));

        let released = if to == TaskStatus::Done {
            let dependents = self
                .dependency_index(task.project_id())?
                .dependents_of(task.sequence_id())
                .to_vec();
            changeset = changeset.with(TaskWrite::ReleaseDependents {
                project_id: task.project_id(),
                blocker: task.sequence_id(),
                at: task.updated_at(),
            });
            dependents
        } else {
            Vec::new()
        };

        self.tasks.apply(&changeset).context("move", id)?;
        info!(task_id = %id, %from, %to, "moved task");
        if !released.is_empty() {
            debug!(blocker = %task.sequence_id(), count = released.len(), "released dependents");
        }
        Ok(StatusChange { task, released })
    }

    /// Deletes a task, releasing its direct dependents first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when the task is missing, or
    /// [`WorkflowError::Persistence`] when the changeset fails.
    pub fn delete_task(&self, id: TaskId) -> WorkflowResult<DeletedTask> {
        let task = self.get_task(id)?;
        let released = self
            .dependency_index(task.project_id())?
            .dependents_of(task.sequence_id())
            .to_vec();
        let changeset = TaskChangeset::new()
            .with(TaskWrite::ReleaseDependents {
                project_id: task.project_id(),
                blocker: task.sequence_id(),
                at: self.clock.utc(),
            })
            .with(TaskWrite::Delete(id));

        self.tasks.apply(&changeset).context("delete", id)?;
        info!(task_id = %id, released = released.len(), "deleted task");
        Ok(DeletedTask { task, released })
    }

    /// Fetches one task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::TaskNotFound`] when the task is missing, or
    /// [`WorkflowError::Persistence`] when the lookup fails.
    pub fn get_task(&self, id: TaskId) -> WorkflowResult<Task> {
        self.tasks
            .find_by_id(id)
            .context("load", id)?
            .ok_or(WorkflowError::TaskNotFound(id))
    }

    /// Returns a project's tasks in one status, ordered by the storage
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ProjectNotFound`] when the project is
    /// missing, or [`WorkflowError::Persistence`].
    pub fn get_tasks_by_status(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
    ) -> WorkflowResult<Vec<Task>> {
        self.require_project(project_id)?;
        self.tasks
            .find_by_status(project_id, status)
            .context("list tasks of", project_id)
    }

    /// Builds the three-column board of a project from a single fetch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ProjectNotFound`] when the project is
    /// missing, or [`WorkflowError::Persistence`].
    pub fn board(&self, project_id: ProjectId) -> WorkflowResult<Board> {
        let project = self.require_project(project_id)?;
        let tasks = self.project_tasks(project_id)?;
        Ok(Board::new(project, &tasks))
    }

    /// Lists the tasks that may be picked as blocker, in sequence order.
    ///
    /// `for_task` is excluded when editing an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ProjectNotFound`] when the project is
    /// missing, or [`WorkflowError::Persistence`].
    pub fn blocker_candidates(
        &self,
        project_id: ProjectId,
        for_task: Option<TaskId>,
    ) -> WorkflowResult<Vec<Task>> {
        self.require_project(project_id)?;
        let tasks = self.project_tasks(project_id)?;
        Ok(dependency::blocker_candidates(&tasks, for_task))
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] for invalid text or colour, or
    /// [`WorkflowError::Persistence`].
    pub fn create_project(&self, request: CreateProjectRequest) -> WorkflowResult<Project> {
        let limits = &self.config.limits;
        let details = ProjectDetails {
            name: limits.name(TextField::ProjectName, &request.name)?,
            description: limits.description(TextField::ProjectDescription, &request.description)?,
            color: request
                .color
                .map(ProjectColor::new)
                .transpose()?
                .unwrap_or_default(),
        };
        let project = Project::new(details, &*self.clock);
        self.projects
            .store(&project)
            .context("store", project.id())?;
        info!(project_id = %project.id(), name = project.name(), "created project");
        Ok(project)
    }

    /// Edits a project's name, description and colour.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Validation`] for invalid input,
    /// [`WorkflowError::ProjectNotFound`], or [`WorkflowError::Persistence`].
    pub fn update_project(&self, request: UpdateProjectRequest) -> WorkflowResult<Project> {
        let mut project = self.require_project(request.id)?;
        let limits = &self.config.limits;
        let details = ProjectDetails {
            name: request
                .name
                .map(|name| limits.name(TextField::ProjectName, &name))
                .transpose()?
                .unwrap_or_else(|| project.name().to_owned()),
            description: request
                .description
                .map(|description| {
                    limits.description(TextField::ProjectDescription, &description)
                })
                .transpose()?
                .unwrap_or_else(|| project.description().to_owned()),
            color: request
                .color
                .map(ProjectColor::new)
                .transpose()?
                .unwrap_or_else(|| project.color().clone()),
        };
        project.edit(details, &*self.clock);
        self.projects
            .update(&project)
            .context("update", project.id())?;
        info!(project_id = %project.id(), "updated project");
        Ok(project)
    }

    /// Deletes a project and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ProjectNotFound`] or
    /// [`WorkflowError::Persistence`].
    pub fn delete_project(&self, id: ProjectId) -> WorkflowResult<Project> {
        let project = self.require_project(id)?;
        self.projects.delete(id).context("delete", id)?;
        info!(project_id = %id, "deleted project");
        Ok(project)
    }

    /// Fetches one project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ProjectNotFound`] or
    /// [`WorkflowError::Persistence`].
    pub fn get_project(&self, id: ProjectId) -> WorkflowResult<Project> {
        self.require_project(id)
    }

    /// Lists every project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] when the lookup fails.
    pub fn list_projects(&self) -> WorkflowResult<Vec<Project>> {
        self.projects.find_all().context("list", "projects")
    }

    fn require_project(&self, id: ProjectId) -> WorkflowResult<Project> {
        self.projects
            .find_by_id(id)
            .context("load", id)?
            .ok_or(WorkflowError::ProjectNotFound(id))
    }

    fn project_tasks(&self, project_id: ProjectId) -> WorkflowResult<Vec<Task>> {
        self.tasks
            .find_by_project(project_id)
            .context("list tasks of", project_id)
    }

    fn dependency_index(&self, project_id: ProjectId) -> WorkflowResult<DependencyIndex> {
        let tasks = self.project_tasks(project_id)?;
        Ok(DependencyIndex::new(&tasks))
    }
}
