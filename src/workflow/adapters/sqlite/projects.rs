//! `SQLite` implementation of the project repository port.

use super::{
    models::{ProjectRow, RowConversionError, row_to_project, to_new_project_row},
    schema::{projects, tasks},
    store::SqliteWorkflowStore,
};
use crate::workflow::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use diesel::prelude::*;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use tracing::debug;

impl From<DieselError> for ProjectRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl From<PoolError> for ProjectRepositoryError {
    fn from(err: PoolError) -> Self {
        Self::persistence(err)
    }
}

impl From<RowConversionError> for ProjectRepositoryError {
    fn from(err: RowConversionError) -> Self {
        Self::persistence(err)
    }
}

impl ProjectRepository for SqliteWorkflowStore {
    fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let new_row = to_new_project_row(project)?;
        self.run(|connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|conn| {
                let existing = projects::table
                    .filter(projects::id.eq(&new_row.id))
                    .count()
                    .get_result::<i64>(conn)?;
                if existing > 0 {
                    return Err(ProjectRepositoryError::DuplicateProject(project.id()));
                }
                diesel::insert_into(projects::table)
                    .values(&new_row)
                    .execute(conn)?;
                Ok(())
            })
        })
    }

    fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run(|conn| {
            let row = projects::table
                .filter(projects::id.eq(id.to_string()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(conn)
                .optional()?;
            Ok(row.map(row_to_project).transpose()?)
        })
    }

    fn find_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run(|conn| {
            let rows = projects::table
                .order((projects::created_at.asc(), projects::name.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(conn)?;
            rows.into_iter()
                .map(|row| row_to_project(row).map_err(ProjectRepositoryError::from))
                .collect()
        })
    }

    fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let row = to_new_project_row(project)?;
        self.run(|conn| {
            let updated = diesel::update(projects::table.filter(projects::id.eq(&row.id)))
                .set((
                    projects::name.eq(&row.name),
                    projects::description.eq(&row.description),
                    projects::color.eq(&row.color),
                    projects::updated_at.eq(row.updated_at),
                ))
                .execute(conn)?;
            if updated == 0 {
                return Err(ProjectRepositoryError::NotFound(project.id()));
            }
            Ok(())
        })
    }

    fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let key = id.to_string();
        self.run(|connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|conn| {
                let removed_tasks = diesel::delete(tasks::table.filter(tasks::project_id.eq(&key)))
                    .execute(conn)?;
                let removed = diesel::delete(projects::table.filter(projects::id.eq(&key)))
                    .execute(conn)?;
                if removed == 0 {
                    return Err(ProjectRepositoryError::NotFound(id));
                }
                debug!(project_id = %id, removed_tasks, "deleted project");
                Ok(())
            })
        })
    }
}
