//! Sequence allocation across reopen and deletion.

use super::helpers::{TaskSpec, stored_project};
use camino::Utf8PathBuf;
use lanes::workflow::{
    adapters::sqlite::SqliteWorkflowStore,
    ports::{TaskRepository, TaskRepositoryError},
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct DatabaseFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl DatabaseFile {
    fn open(&self) -> eyre::Result<SqliteWorkflowStore> {
        Ok(SqliteWorkflowStore::open(self.path.as_str())?)
    }
}

#[fixture]
fn database() -> DatabaseFile {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("lanes.db"))
        .expect("temp dir should be UTF-8");
    DatabaseFile { _dir: dir, path }
}

#[rstest]
fn sequences_continue_after_reopen(database: DatabaseFile) -> eyre::Result<()> {
    {
        let store = database.open()?;
        eyre::ensure!(store.next_sequence_id()?.value() == 1);
        eyre::ensure!(store.next_sequence_id()?.value() == 2);
    }

    let reopened = database.open()?;
    eyre::ensure!(reopened.next_sequence_id()?.value() == 3);
    Ok(())
}

#[rstest]
fn deleted_sequences_are_not_reused(database: DatabaseFile) -> eyre::Result<()> {
    let store = database.open()?;
    let project = stored_project(&store, "Home")?;
    let sequence = store.next_sequence_id()?;
    let task = TaskSpec::new(project.id(), sequence.value()).build();
    TaskRepository::store(&store, &task)?;
    TaskRepository::delete(&store, task.id())?;

    eyre::ensure!(store.next_sequence_id()? > sequence);
    Ok(())
}

#[rstest]
fn explicit_sequences_advance_the_counter(database: DatabaseFile) -> eyre::Result<()> {
    let store = database.open()?;
    let project = stored_project(&store, "Home")?;
    TaskRepository::store(&store, &TaskSpec::new(project.id(), 40).build())?;

    eyre::ensure!(store.next_sequence_id()?.value() == 41);
    Ok(())
}

#[rstest]
fn duplicate_sequence_is_rejected(database: DatabaseFile) -> eyre::Result<()> {
    let store = database.open()?;
    let project = stored_project(&store, "Home")?;
    TaskRepository::store(&store, &TaskSpec::new(project.id(), 7).build())?;

    let result = TaskRepository::store(&store, &TaskSpec::new(project.id(), 7).build());
    eyre::ensure!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateSequence(_))
    ));
    Ok(())
}
