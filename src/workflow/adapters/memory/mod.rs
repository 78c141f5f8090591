//! In-memory workflow store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::workflow::{
    domain::{
        Project, ProjectId, SequenceId, Task, TaskId, TaskStatus, dependency, ordering,
    },
    ports::{
        ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, TaskChangeset,
        TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskWrite,
    },
};

/// Thread-safe in-memory store implementing both workflow repositories.
///
/// Clones share state, so one store can be handed to the service as both
/// the task and the project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    sequence_index: HashMap<SequenceId, TaskId>,
    last_sequence: Option<SequenceId>,
}

impl InMemoryWorkflowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

impl InMemoryState {
    fn project_tasks(&self, project_id: ProjectId) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(move |task| task.project_id() == project_id)
    }

    fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.remove(&id)?;
        self.sequence_index.remove(&task.sequence_id());
        Some(task)
    }
}

/// Applies one write to a scratch copy of the task table.
fn apply_write(
    tasks: &mut HashMap<TaskId, Task>,
    write: &TaskWrite,
) -> TaskRepositoryResult<()> {
    match write {
        TaskWrite::Status(task) => {
            let stored = tasks
                .get_mut(&task.id())
                .ok_or(TaskRepositoryError::NotFound(task.id()))?;
            stored.apply_status_from(task);
        }
        TaskWrite::ReleaseDependents {
            project_id,
            blocker,
            at,
        } => {
            let mut dependents: Vec<Task> = tasks
                .values()
                .filter(|task| task.project_id() == *project_id)
                .cloned()
                .collect();
            dependency::release_dependents(*blocker, &mut dependents, *at);
            for task in dependents {
                tasks.insert(task.id(), task);
            }
        }
        TaskWrite::Delete(id) => {
            tasks.remove(id).ok_or(TaskRepositoryError::NotFound(*id))?;
        }
    }
    Ok(())
}

impl TaskRepository for InMemoryWorkflowStore {
    fn next_sequence_id(&self) -> TaskRepositoryResult<SequenceId> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let next = match state.last_sequence {
            None => SequenceId::new(1).map_err(TaskRepositoryError::persistence)?,
            Some(last) => last.next().ok_or(TaskRepositoryError::SequenceExhausted)?,
        };
        state.last_sequence = Some(next);
        Ok(next)
    }

    fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if state.sequence_index.contains_key(&task.sequence_id()) {
            return Err(TaskRepositoryError::DuplicateSequence(task.sequence_id()));
        }

        state.sequence_index.insert(task.sequence_id(), task.id());
        if state.last_sequence < Some(task.sequence_id()) {
            state.last_sequence = Some(task.sequence_id());
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = state.project_tasks(project_id).cloned().collect();
        tasks.sort_by_key(Task::sequence_id);
        Ok(tasks)
    }

    fn find_by_status(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(ordering::filter_and_sort(
            status,
            state.project_tasks(project_id),
        ))
    }

    fn apply(&self, changeset: &TaskChangeset) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;

        // Stage against a copy so a failing write leaves the store untouched.
        let mut staged = state.tasks.clone();
        for write in changeset.writes() {
            apply_write(&mut staged, write)?;
        }

        let removed: Vec<TaskId> = state
            .tasks
            .keys()
            .filter(|id| !staged.contains_key(id))
            .copied()
            .collect();
        for id in removed {
            state.remove_task(id);
        }
        state.tasks = staged;
        Ok(())
    }
}

impl ProjectRepository for InMemoryWorkflowStore {
    fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.write().map_err(ProjectRepositoryError::persistence)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.read().map_err(ProjectRepositoryError::persistence)?;
        Ok(state.projects.get(&id).cloned())
    }

    fn find_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.read().map_err(ProjectRepositoryError::persistence)?;
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        projects.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.name().cmp(right.name()))
        });
        Ok(projects)
    }

    fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.write().map_err(ProjectRepositoryError::persistence)?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *stored = project.clone();
        Ok(())
    }

    fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.write().map_err(ProjectRepositoryError::persistence)?;
        state
            .projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        let owned: Vec<TaskId> = state.project_tasks(id).map(Task::id).collect();
        for task_id in owned {
            state.remove_task(task_id);
        }
        Ok(())
    }
}
