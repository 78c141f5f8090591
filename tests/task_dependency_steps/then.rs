//! Then steps for task dependency scenarios.

use super::world::DependencyWorld;
use eyre::{ensure, eyre};
use lanes::workflow::{
    domain::{TaskDomainError, TaskStatus},
    services::WorkflowError,
};
use rstest_bdd_macros::then;

#[then(r#""{name}" is in status "{status}""#)]
fn task_in_status(world: &DependencyWorld, name: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.reload(&name)?;
    ensure!(
        task.status() == expected,
        "expected {name} in {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#""{name}" is not blocked"#)]
fn task_not_blocked(world: &DependencyWorld, name: String) -> Result<(), eyre::Report> {
    let task = world.reload(&name)?;
    ensure!(
        task.blocked_by().is_none(),
        "expected {name} to be unblocked, found blocker {:?}",
        task.blocked_by()
    );
    Ok(())
}

#[then(r#""{name}" is blocked by "{blocker}""#)]
fn task_blocked_by(world: &DependencyWorld, name: String, blocker: String) -> Result<(), eyre::Report> {
    let expected = world.reload(&blocker)?.sequence_id();
    let task = world.reload(&name)?;
    ensure!(
        task.blocked_by() == Some(expected),
        "expected {name} blocked by {expected}, found {:?}",
        task.blocked_by()
    );
    Ok(())
}

#[then("the last move released {count:usize} task")]
fn last_move_released(world: &DependencyWorld, count: usize) -> Result<(), eyre::Report> {
    let change = world
        .last_change
        .as_ref()
        .ok_or_else(|| eyre!("missing status change in scenario world"))?;
    ensure!(
        change.released.len() == count,
        "expected {count} released tasks, found {}",
        change.released.len()
    );
    Ok(())
}

#[then("the last operation failed with a self-blocking error")]
fn failed_with_self_blocking(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre!("expected the last operation to fail"))?;
    ensure!(
        matches!(
            err,
            WorkflowError::Validation(TaskDomainError::SelfBlocking(_))
        ),
        "expected SelfBlocking error, got {err:?}"
    );
    Ok(())
}
