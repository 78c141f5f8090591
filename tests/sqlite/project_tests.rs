//! Project persistence and cascading deletes.

use super::helpers::{TaskSpec, project, store, stored_project};
use lanes::workflow::{
    adapters::sqlite::SqliteWorkflowStore,
    domain::{ProjectColor, ProjectDetails, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, TaskRepository},
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
fn find_all_lists_oldest_first(store: SqliteWorkflowStore) -> eyre::Result<()> {
    for (name, created) in [("Work", 30), ("Home", 10), ("Garden", 20)] {
        ProjectRepository::store(&store, &project(name, created))?;
    }

    let names: Vec<String> = store
        .find_all()?
        .iter()
        .map(|found| found.name().to_owned())
        .collect();
    eyre::ensure!(names == ["Home", "Garden", "Work"], "unexpected order {names:?}");
    Ok(())
}

#[rstest]
fn duplicate_project_is_rejected(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let created = stored_project(&store, "Home")?;
    let result = ProjectRepository::store(&store, &created);
    eyre::ensure!(matches!(
        result,
        Err(ProjectRepositoryError::DuplicateProject(id)) if id == created.id()
    ));
    Ok(())
}

#[rstest]
fn update_persists_edited_fields(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let mut created = stored_project(&store, "Home")?;
    created.edit(
        ProjectDetails {
            name: "House".to_owned(),
            description: "Chores".to_owned(),
            color: ProjectColor::new("#FF8800")?,
        },
        &DefaultClock,
    );
    ProjectRepository::update(&store, &created)?;

    let loaded = ProjectRepository::find_by_id(&store, created.id())?;
    eyre::ensure!(loaded.as_ref() == Some(&created));
    eyre::ensure!(created.color().as_str() == "#ff8800");
    Ok(())
}

#[rstest]
fn delete_removes_project_tasks_only(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let home = stored_project(&store, "Home")?;
    let work = stored_project(&store, "Work")?;
    TaskRepository::store(&store, &TaskSpec::new(home.id(), 1).build())?;
    TaskRepository::store(&store, &TaskSpec::new(home.id(), 2).build())?;
    TaskRepository::store(&store, &TaskSpec::new(work.id(), 3).build())?;

    ProjectRepository::delete(&store, home.id())?;

    eyre::ensure!(ProjectRepository::find_by_id(&store, home.id())?.is_none());
    eyre::ensure!(store.find_by_project(home.id())?.is_empty());
    eyre::ensure!(store.find_by_project(work.id())?.len() == 1);
    Ok(())
}

#[rstest]
fn delete_of_missing_project_is_not_found(store: SqliteWorkflowStore) {
    let missing = ProjectId::new();
    let result = ProjectRepository::delete(&store, missing);
    assert!(matches!(
        result,
        Err(ProjectRepositoryError::NotFound(id)) if id == missing
    ));
}
