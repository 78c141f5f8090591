//! Blocking relation between tasks of one project.
//!
//! A dependent names its blocker by sequence identifier. Only one hop is
//! modelled: releasing a blocker clears `blocked_by` on its direct dependents
//! and never walks further. Releasing is one-way; nothing here re-blocks a
//! task.

use super::{SequenceId, Task, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Lookup of dependents by blocker over a project's task set.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    dependents: HashMap<SequenceId, Vec<TaskId>>,
    known: HashMap<SequenceId, TaskId>,
}

impl DependencyIndex {
    /// Indexes the blocking edges among `tasks`.
    #[must_use]
    pub fn new<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut index = Self::default();
        for task in tasks {
            index.known.insert(task.sequence_id(), task.id());
            if let Some(blocker) = task.blocked_by() {
                index.dependents.entry(blocker).or_default().push(task.id());
            }
        }
        index
    }

    /// Returns the tasks directly blocked by `blocker`.
    #[must_use]
    pub fn dependents_of(&self, blocker: SequenceId) -> &[TaskId] {
        self.dependents
            .get(&blocker)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the task that owns `sequence_id`, if it is in the index.
    #[must_use]
    pub fn task_for(&self, sequence_id: SequenceId) -> Option<TaskId> {
        self.known.get(&sequence_id).copied()
    }

    /// Checks that `blocker` may be assigned to `task`.
    ///
    /// `task` is `None` when validating a task that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnknownBlocker`] when no indexed task owns
    /// `blocker`, or [`TaskDomainError::SelfBlocking`] when it is `task`
    /// itself.
    pub fn validate_blocker(
        &self,
        task: Option<TaskId>,
        blocker: SequenceId,
    ) -> Result<(), TaskDomainError> {
        match (self.task_for(blocker), task) {
            (None, _) => Err(TaskDomainError::UnknownBlocker(blocker)),
            (Some(owner), Some(id)) if owner == id => Err(TaskDomainError::SelfBlocking(id)),
            _ => Ok(()),
        }
    }
}

/// Clears `blocked_by` on every direct dependent of `blocker`.
///
/// Each released task gets `updated_at = at`. Returns the released task ids;
/// an empty result is not an error.
pub fn release_dependents(
    blocker: SequenceId,
    tasks: &mut [Task],
    at: DateTime<Utc>,
) -> Vec<TaskId> {
    tasks
        .iter_mut()
        .filter_map(|task| task.release_from(blocker, at).then(|| task.id()))
        .collect()
}

/// Returns the tasks a user may pick as blocker, in sequence order.
///
/// `exclude` is the task being edited, which cannot block itself.
#[must_use]
pub fn blocker_candidates<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    exclude: Option<TaskId>,
) -> Vec<Task> {
    let mut candidates: Vec<Task> = tasks
        .into_iter()
        .filter(|task| Some(task.id()) != exclude)
        .cloned()
        .collect();
    candidates.sort_by_key(Task::sequence_id);
    candidates
}
