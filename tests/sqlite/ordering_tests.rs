//! Ordering agreement between `find_by_status` and the in-memory policy.

use super::helpers::{TaskSpec, at, seq, sequences, store, stored_project};
use lanes::workflow::{
    adapters::{memory::InMemoryWorkflowStore, sqlite::SqliteWorkflowStore},
    domain::{ProjectId, Task, TaskPriority, TaskStatus, ordering},
    ports::{ProjectRepository, TaskRepository},
};
use rstest::rstest;

fn mixed_tasks(project_id: ProjectId) -> Vec<Task> {
    vec![
        TaskSpec::new(project_id, 1).priority(TaskPriority::Low).created(10).build(),
        TaskSpec::new(project_id, 2).priority(TaskPriority::High).created(30).build(),
        TaskSpec::new(project_id, 3).priority(TaskPriority::High).created(20).build(),
        TaskSpec::new(project_id, 4).priority(TaskPriority::Medium).created(20).build(),
        TaskSpec::new(project_id, 5).priority(TaskPriority::High).created(20).build(),
        TaskSpec::new(project_id, 6).status(TaskStatus::InProgress).updated(50).build(),
        TaskSpec::new(project_id, 7).status(TaskStatus::InProgress).updated(70).build(),
        TaskSpec::new(project_id, 8).status(TaskStatus::InProgress).updated(50).build(),
        TaskSpec::new(project_id, 9).status(TaskStatus::Done).updated(40).build(),
        TaskSpec::new(project_id, 10).status(TaskStatus::Done).updated(90).build(),
    ]
}

#[rstest]
#[case(TaskStatus::NotStarted, vec![3, 5, 2, 4, 1])]
#[case(TaskStatus::InProgress, vec![7, 6, 8])]
#[case(TaskStatus::Done, vec![10, 9])]
fn sql_order_matches_policy(
    store: SqliteWorkflowStore,
    #[case] status: TaskStatus,
    #[case] expected: Vec<u32>,
) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let tasks = mixed_tasks(project.id());
    for task in &tasks {
        TaskRepository::store(&store, task)?;
    }

    let from_sql = store.find_by_status(project.id(), status)?;
    let in_memory = ordering::filter_and_sort(status, &tasks);

    eyre::ensure!(sequences(&from_sql) == expected, "sql order {:?}", sequences(&from_sql));
    eyre::ensure!(from_sql == in_memory, "sql and in-memory order differ");
    Ok(())
}

#[rstest]
fn both_adapters_agree_for_every_status(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let memory = InMemoryWorkflowStore::new();
    let project = stored_project(&store, "Home")?;
    ProjectRepository::store(&memory, &project)?;
    for task in mixed_tasks(project.id()) {
        TaskRepository::store(&store, &task)?;
        TaskRepository::store(&memory, &task)?;
    }

    for status in TaskStatus::ALL {
        let from_sql = store.find_by_status(project.id(), status)?;
        let from_memory = memory.find_by_status(project.id(), status)?;
        eyre::ensure!(from_sql == from_memory, "adapters disagree for {status}");
    }
    Ok(())
}

#[rstest]
fn status_write_touches_the_same_fields_in_both_adapters(
    store: SqliteWorkflowStore,
) -> eyre::Result<()> {
    let memory = InMemoryWorkflowStore::new();
    let project = stored_project(&store, "Home")?;
    ProjectRepository::store(&memory, &project)?;
    let stored = TaskSpec::new(project.id(), 2).blocked_by(1).build();
    TaskRepository::store(&store, &stored)?;
    TaskRepository::store(&memory, &stored)?;
    let moved = TaskSpec::new(project.id(), 2)
        .id(stored.id())
        .name("renamed elsewhere")
        .status(TaskStatus::Done)
        .updated(40)
        .build();

    store.update_status(&moved)?;
    memory.update_status(&moved)?;

    let from_sql = TaskRepository::find_by_id(&store, stored.id())?;
    let from_memory = TaskRepository::find_by_id(&memory, stored.id())?;
    eyre::ensure!(from_sql == from_memory, "adapters disagree after a status write");
    let reloaded = from_sql.ok_or_else(|| eyre::eyre!("task should still be stored"))?;
    eyre::ensure!(reloaded.status() == TaskStatus::Done);
    eyre::ensure!(reloaded.updated_at() == at(40));
    eyre::ensure!(reloaded.name() == stored.name());
    eyre::ensure!(reloaded.blocked_by() == Some(seq(1)));
    Ok(())
}

#[rstest]
fn find_by_status_is_scoped_to_project(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let home = stored_project(&store, "Home")?;
    let work = stored_project(&store, "Work")?;
    TaskRepository::store(&store, &TaskSpec::new(home.id(), 1).build())?;
    TaskRepository::store(&store, &TaskSpec::new(work.id(), 2).build())?;

    let found = store.find_by_status(home.id(), TaskStatus::NotStarted)?;
    eyre::ensure!(sequences(&found) == vec![1]);
    Ok(())
}

#[rstest]
fn stored_tasks_round_trip_exactly(store: SqliteWorkflowStore) -> eyre::Result<()> {
    let project = stored_project(&store, "Home")?;
    let task = TaskSpec::new(project.id(), 4)
        .status(TaskStatus::Done)
        .priority(TaskPriority::Medium)
        .created(1_700_000_000)
        .updated(1_700_000_123)
        .blocked_by(2)
        .build();
    TaskRepository::store(&store, &task)?;

    let loaded = TaskRepository::find_by_id(&store, task.id())?;
    eyre::ensure!(loaded.as_ref() == Some(&task), "round trip changed the task");
    Ok(())
}
