//! Column ordering for kanban status buckets.
//!
//! - Not started: priority descending, then oldest first.
//! - In progress and done: most recently updated first.
//!
//! Every bucket breaks remaining ties by ascending sequence identifier so the
//! order is total. The SQLite adapter encodes the same rule in `ORDER BY`;
//! the two must stay in step.

use super::{Task, TaskStatus};
use std::cmp::Ordering;

/// Compares two tasks for display within the `status` column.
#[must_use]
pub fn compare(status: TaskStatus, left: &Task, right: &Task) -> Ordering {
    let primary = match status {
        TaskStatus::NotStarted => right
            .priority()
            .cmp(&left.priority())
            .then_with(|| left.created_at().cmp(&right.created_at())),
        TaskStatus::InProgress | TaskStatus::Done => right.updated_at().cmp(&left.updated_at()),
    };
    primary.then_with(|| left.sequence_id().cmp(&right.sequence_id()))
}

/// Sorts tasks already filtered to `status` into column order.
pub fn sort_for_status(status: TaskStatus, tasks: &mut [Task]) {
    tasks.sort_by(|left, right| compare(status, left, right));
}

/// Filters `tasks` to `status` and returns them in column order.
#[must_use]
pub fn filter_and_sort<'a>(
    status: TaskStatus,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<Task> {
    let mut column: Vec<Task> = tasks
        .into_iter()
        .filter(|task| task.status() == status)
        .cloned()
        .collect();
    sort_for_status(status, &mut column);
    column
}
