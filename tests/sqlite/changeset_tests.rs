//! All-or-nothing changeset application.

use super::helpers::{TaskSpec, at, seq, store, stored_project};
use lanes::workflow::{
    adapters::sqlite::SqliteWorkflowStore,
    domain::{TaskId, TaskStatus},
    ports::{TaskChangeset, TaskRepository, TaskRepositoryError, TaskWrite},
};
use rstest::rstest;

#[rstest]
fn release_clears_only_direct_dependents(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let blocker = TaskSpec::new(project.id(), 1).build();
    let direct = TaskSpec::new(project.id(), 2).blocked_by(1).build();
    let indirect = TaskSpec::new(project.id(), 3).blocked_by(2).build();
    for task in [&blocker, &direct, &indirect] {
        TaskRepository::store(&store, task)?;
    }

    store.clear_blocked_by(project.id(), seq(1), at(500))?;

    let released = TaskRepository::find_by_id(&store, direct.id())?.ok_or_else(|| eyre::eyre!("missing"))?;
    let untouched = TaskRepository::find_by_id(&store, indirect.id())?.ok_or_else(|| eyre::eyre!("missing"))?;
    eyre::ensure!(released.blocked_by().is_none());
    eyre::ensure!(released.updated_at() == at(500));
    eyre::ensure!(untouched.blocked_by() == Some(seq(2)));
    eyre::ensure!(untouched.updated_at() == at(0));
    Ok(())
}

#[rstest]
fn failing_write_rolls_back_earlier_writes(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let blocker = TaskSpec::new(project.id(), 1).status(TaskStatus::InProgress).build();
    let dependent = TaskSpec::new(project.id(), 2).blocked_by(1).build();
    TaskRepository::store(&store, &blocker)?;
    TaskRepository::store(&store, &dependent)?;

    let moved = TaskSpec::new(project.id(), 1)
        .id(blocker.id())
        .status(TaskStatus::Done)
        .updated(900)
        .build();
    let missing = TaskId::new();
    let changeset = TaskChangeset::new()
        .with(TaskWrite::Status(moved))
        .with(TaskWrite::ReleaseDependents {
            project_id: project.id(),
            blocker: seq(1),
            at: at(900),
        })
        .with(TaskWrite::Delete(missing));

    let result = store.apply(&changeset);

    eyre::ensure!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    let reloaded_blocker = TaskRepository::find_by_id(&store, blocker.id())?;
    let reloaded_dependent = TaskRepository::find_by_id(&store, dependent.id())?;
    eyre::ensure!(reloaded_blocker.as_ref() == Some(&blocker), "status write survived");
    eyre::ensure!(reloaded_dependent.as_ref() == Some(&dependent), "release survived");
    Ok(())
}

#[rstest]
fn delete_changeset_releases_then_removes(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let blocker = TaskSpec::new(project.id(), 1).build();
    let first = TaskSpec::new(project.id(), 2).blocked_by(1).build();
    let second = TaskSpec::new(project.id(), 3).blocked_by(1).build();
    for task in [&blocker, &first, &second] {
        TaskRepository::store(&store, task)?;
    }

    let changeset = TaskChangeset::new()
        .with(TaskWrite::ReleaseDependents {
            project_id: project.id(),
            blocker: seq(1),
            at: at(10),
        })
        .with(TaskWrite::Delete(blocker.id()));
    store.apply(&changeset)?;

    let remaining = store.find_by_project(project.id())?;
    eyre::ensure!(remaining.len() == 2);
    eyre::ensure!(remaining.iter().all(|task| task.blocked_by().is_none()));
    Ok(())
}

#[rstest]
fn update_of_missing_task_is_not_found(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let task = TaskSpec::new(project.id(), 1).build();
    let result = TaskRepository::update(&store, &task);
    eyre::ensure!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
    Ok(())
}
