//! Diesel row models and conversions for workflow persistence.

use super::schema::{projects, tasks};
use crate::workflow::domain::{
    PersistedProjectData, PersistedTaskData, Project, ProjectColor, ProjectId, SequenceId, Task,
    TaskId, TaskPriority, TaskStatus, TaskType,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use thiserror::Error;
use uuid::Uuid;

/// Conversion failure between rows and domain values.
#[derive(Debug, Error)]
pub enum RowConversionError {
    /// A timestamp falls outside the range representable in nanoseconds.
    #[error("timestamp {0} cannot be stored as Unix nanoseconds")]
    TimestampOutOfRange(DateTime<Utc>),
    /// A stored identifier is not a UUID.
    #[error("invalid stored identifier '{value}': {source}")]
    InvalidId {
        /// Stored text.
        value: String,
        /// Parse failure.
        #[source]
        source: uuid::Error,
    },
    /// A stored value failed domain parsing.
    #[error("invalid stored value: {0}")]
    InvalidValue(String),
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: String,
    /// Sequence identifier.
    pub sequence_id: i64,
    /// Owning project identifier.
    pub project_id: String,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Priority rank.
    pub priority: i32,
    /// Classification tag.
    pub task_type: String,
    /// Blocker sequence identifier.
    pub blocked_by: Option<i64>,
    /// Creation timestamp in Unix nanoseconds.
    pub created_at: i64,
    /// Last update timestamp in Unix nanoseconds.
    pub updated_at: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: String,
    /// Sequence identifier.
    pub sequence_id: i64,
    /// Owning project identifier.
    pub project_id: String,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Priority rank.
    pub priority: i32,
    /// Classification tag.
    pub task_type: String,
    /// Blocker sequence identifier.
    pub blocked_by: Option<i64>,
    /// Creation timestamp in Unix nanoseconds.
    pub created_at: i64,
    /// Last update timestamp in Unix nanoseconds.
    pub updated_at: i64,
}

/// Changeset for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskUpdateRow {
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Priority rank.
    pub priority: i32,
    /// Classification tag.
    pub task_type: String,
    /// Blocker sequence identifier.
    pub blocked_by: Option<i64>,
    /// Last update timestamp in Unix nanoseconds.
    pub updated_at: i64,
}

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Display colour.
    pub color: String,
    /// Creation timestamp in Unix nanoseconds.
    pub created_at: i64,
    /// Last update timestamp in Unix nanoseconds.
    pub updated_at: i64,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Display colour.
    pub color: String,
    /// Creation timestamp in Unix nanoseconds.
    pub created_at: i64,
    /// Last update timestamp in Unix nanoseconds.
    pub updated_at: i64,
}

/// Converts a timestamp to its stored form.
///
/// # Errors
///
/// Returns [`RowConversionError::TimestampOutOfRange`] past the year 2262.
pub fn to_nanos(timestamp: DateTime<Utc>) -> Result<i64, RowConversionError> {
    timestamp
        .timestamp_nanos_opt()
        .ok_or(RowConversionError::TimestampOutOfRange(timestamp))
}

/// Converts a stored timestamp back to UTC.
#[must_use]
pub fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_nanos(nanos)
}

fn parse_uuid(value: &str) -> Result<Uuid, RowConversionError> {
    Uuid::parse_str(value).map_err(|source| RowConversionError::InvalidId {
        value: value.to_owned(),
        source,
    })
}

fn invalid(err: impl std::fmt::Display) -> RowConversionError {
    RowConversionError::InvalidValue(err.to_string())
}

/// Builds an insert row from a task.
///
/// # Errors
///
/// Returns [`RowConversionError`] when a timestamp cannot be stored.
pub fn to_new_task_row(task: &Task) -> Result<NewTaskRow, RowConversionError> {
    Ok(NewTaskRow {
        id: task.id().to_string(),
        sequence_id: i64::from(task.sequence_id()),
        project_id: task.project_id().to_string(),
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().rank(),
        task_type: task.task_type().as_str().to_owned(),
        blocked_by: task.blocked_by().map(i64::from),
        created_at: to_nanos(task.created_at())?,
        updated_at: to_nanos(task.updated_at())?,
    })
}

/// Builds an update row from a task.
///
/// # Errors
///
/// Returns [`RowConversionError`] when a timestamp cannot be stored.
pub fn to_task_update_row(task: &Task) -> Result<TaskUpdateRow, RowConversionError> {
    Ok(TaskUpdateRow {
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().rank(),
        task_type: task.task_type().as_str().to_owned(),
        blocked_by: task.blocked_by().map(i64::from),
        updated_at: to_nanos(task.updated_at())?,
    })
}

/// Reconstructs a task from a stored row.
///
/// # Errors
///
/// Returns [`RowConversionError`] when a stored value is not a valid domain
/// value.
pub fn row_to_task(row: TaskRow) -> Result<Task, RowConversionError> {
    let TaskRow {
        id,
        sequence_id,
        project_id,
        name,
        description,
        status,
        priority,
        task_type,
        blocked_by,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(parse_uuid(&id)?),
        sequence_id: SequenceId::try_from(sequence_id).map_err(invalid)?,
        project_id: ProjectId::from_uuid(parse_uuid(&project_id)?),
        name,
        description,
        status: TaskStatus::try_from(status.as_str()).map_err(invalid)?,
        priority: TaskPriority::from_rank(priority).map_err(invalid)?,
        task_type: TaskType::try_from(task_type.as_str()).map_err(invalid)?,
        blocked_by: blocked_by
            .map(SequenceId::try_from)
            .transpose()
            .map_err(invalid)?,
        created_at: from_nanos(created_at),
        updated_at: from_nanos(updated_at),
    };
    Ok(Task::from_persisted(data))
}

/// Builds an insert row from a project.
///
/// # Errors
///
/// Returns [`RowConversionError`] when a timestamp cannot be stored.
pub fn to_new_project_row(project: &Project) -> Result<NewProjectRow, RowConversionError> {
    Ok(NewProjectRow {
        id: project.id().to_string(),
        name: project.name().to_owned(),
        description: project.description().to_owned(),
        color: project.color().as_str().to_owned(),
        created_at: to_nanos(project.created_at())?,
        updated_at: to_nanos(project.updated_at())?,
    })
}

/// Reconstructs a project from a stored row.
///
/// # Errors
///
/// Returns [`RowConversionError`] when a stored value is not a valid domain
/// value.
pub fn row_to_project(row: ProjectRow) -> Result<Project, RowConversionError> {
    let data = PersistedProjectData {
        id: ProjectId::from_uuid(parse_uuid(&row.id)?),
        name: row.name,
        description: row.description,
        color: ProjectColor::new(row.color).map_err(invalid)?,
        created_at: from_nanos(row.created_at),
        updated_at: from_nanos(row.updated_at),
    };
    Ok(Project::from_persisted(data))
}
