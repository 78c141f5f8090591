//! Three-column board read model.

use crate::workflow::domain::{Project, Task, TaskStatus, ordering};
use serde::Serialize;

/// Tasks of one status, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    status: TaskStatus,
    tasks: Vec<Task>,
}

impl BoardColumn {
    /// Returns the column status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the column's tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the column has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A project's tasks split into Not Started, In Progress and Done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    project: Project,
    columns: [BoardColumn; 3],
}

impl Board {
    /// Builds a board from a project's full task set.
    ///
    /// Each column is filtered and ordered with [`ordering::filter_and_sort`].
    #[must_use]
    pub fn new(project: Project, tasks: &[Task]) -> Self {
        let columns = TaskStatus::ALL.map(|status| BoardColumn {
            status,
            tasks: ordering::filter_and_sort(status, tasks),
        });
        Self { project, columns }
    }

    /// Returns the project shown on the board.
    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Returns the columns left to right.
    #[must_use]
    pub const fn columns(&self) -> &[BoardColumn; 3] {
        &self.columns
    }

    /// Returns the column for `status`.
    #[must_use]
    pub const fn column(&self, status: TaskStatus) -> &BoardColumn {
        let [not_started, in_progress, done] = &self.columns;
        match status {
            TaskStatus::NotStarted => not_started,
            TaskStatus::InProgress => in_progress,
            TaskStatus::Done => done,
        }
    }

    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(BoardColumn::len).sum()
    }
}
