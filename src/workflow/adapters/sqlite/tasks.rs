//! `SQLite` implementation of the task repository port.

use super::{
    models::{
        RowConversionError, TaskRow, row_to_task, to_nanos, to_new_task_row, to_task_update_row,
    },
    schema::{task_sequence, tasks},
    store::SqliteWorkflowStore,
};
use crate::workflow::{
    domain::{ProjectId, SequenceId, Task, TaskId, TaskStatus},
    ports::{TaskChangeset, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskWrite},
};
use diesel::prelude::*;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<PoolError> for TaskRepositoryError {
    fn from(err: PoolError) -> Self {
        Self::persistence(err)
    }
}

impl From<RowConversionError> for TaskRepositoryError {
    fn from(err: RowConversionError) -> Self {
        Self::persistence(err)
    }
}

impl TaskRepository for SqliteWorkflowStore {
    fn next_sequence_id(&self) -> TaskRepositoryResult<SequenceId> {
        self.run(|connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                diesel::update(task_sequence::table.filter(task_sequence::id.eq(1)))
                    .set(task_sequence::last_value.eq(task_sequence::last_value + 1))
                    .execute(conn)?;
                let allocated = task_sequence::table
                    .filter(task_sequence::id.eq(1))
                    .select(task_sequence::last_value)
                    .first::<i64>(conn)?;
                SequenceId::try_from(allocated).map_err(|_| TaskRepositoryError::SequenceExhausted)
            })
        })
    }

    fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let new_row = to_new_task_row(task)?;
        self.run(|connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                if find_row(conn, task.id())?.is_some() {
                    return Err(TaskRepositoryError::DuplicateTask(task.id()));
                }
                let sequence_taken = tasks::table
                    .filter(tasks::sequence_id.eq(new_row.sequence_id))
                    .count()
                    .get_result::<i64>(conn)?;
                if sequence_taken > 0 {
                    return Err(TaskRepositoryError::DuplicateSequence(task.sequence_id()));
                }

                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(conn)?;
                diesel::sql_query(
                    "UPDATE task_sequence SET last_value = MAX(last_value, ?) WHERE id = 1",
                )
                .bind::<BigInt, _>(new_row.sequence_id)
                .execute(conn)?;
                Ok(())
            })
        })
    }

    fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let changes = to_task_update_row(task)?;
        self.run(|conn| {
            let updated =
                diesel::update(tasks::table.filter(tasks::id.eq(task.id().to_string())))
                    .set(&changes)
                    .execute(conn)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task.id()));
            }
            Ok(())
        })
    }

    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run(|conn| {
            let row = find_row(conn, id)?;
            Ok(row.map(row_to_task).transpose()?)
        })
    }

    fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run(|conn| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.to_string()))
                .order(tasks::sequence_id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(conn)?;
            rows_to_tasks(rows)
        })
    }

    fn find_by_status(
        &self,
        project_id: ProjectId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run(|conn| {
            let query = tasks::table
                .filter(tasks::project_id.eq(project_id.to_string()))
                .filter(tasks::status.eq(status.as_str()))
                .select(TaskRow::as_select())
                .into_boxed();

            // Mirrors domain::ordering::compare.
            let ordered = match status {
                TaskStatus::NotStarted => query.order((
                    tasks::priority.desc(),
                    tasks::created_at.asc(),
                    tasks::sequence_id.asc(),
                )),
                TaskStatus::InProgress | TaskStatus::Done => {
                    query.order((tasks::updated_at.desc(), tasks::sequence_id.asc()))
                }
            };
            let rows = ordered.load::<TaskRow>(conn)?;
            rows_to_tasks(rows)
        })
    }

    fn apply(&self, changeset: &TaskChangeset) -> TaskRepositoryResult<()> {
        if changeset.is_empty() {
            return Ok(());
        }
        self.run(|connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                for write in changeset.writes() {
                    apply_write(conn, write)?;
                }
                Ok(())
            })
        })
    }
}

fn apply_write(conn: &mut SqliteConnection, write: &TaskWrite) -> TaskRepositoryResult<()> {
    match write {
        TaskWrite::Status(task) => {
            let updated =
                diesel::update(tasks::table.filter(tasks::id.eq(task.id().to_string())))
                    .set((
                        tasks::status.eq(task.status().as_str()),
                        tasks::updated_at.eq(to_nanos(task.updated_at())?),
                    ))
                    .execute(conn)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task.id()));
            }
        }
        TaskWrite::ReleaseDependents {
            project_id,
            blocker,
            at,
        } => {
            let released = diesel::update(
                tasks::table
                    .filter(tasks::project_id.eq(project_id.to_string()))
                    .filter(tasks::blocked_by.eq(i64::from(*blocker))),
            )
            .set((
                tasks::blocked_by.eq(None::<i64>),
                tasks::updated_at.eq(to_nanos(*at)?),
            ))
            .execute(conn)?;
            debug!(%blocker, released, "released dependents");
        }
        TaskWrite::Delete(id) => {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.to_string())))
                .execute(conn)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(*id));
            }
        }
    }
    Ok(())
}

fn find_row(conn: &mut SqliteConnection, id: TaskId) -> TaskRepositoryResult<Option<TaskRow>> {
    Ok(tasks::table
        .filter(tasks::id.eq(id.to_string()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(conn)
        .optional()?)
}

fn rows_to_tasks(rows: Vec<TaskRow>) -> TaskRepositoryResult<Vec<Task>> {
    rows.into_iter()
        .map(|row| row_to_task(row).map_err(TaskRepositoryError::from))
        .collect()
}
