//! When steps for task dependency scenarios.

use super::world::DependencyWorld;
use eyre::{WrapErr, bail};
use lanes::workflow::domain::MoveDirection;
use rstest_bdd_macros::when;

#[when(r#""{name}" moves {direction} {count:usize} times"#)]
fn task_moves(
    world: &mut DependencyWorld,
    name: String,
    direction: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let step = match direction.as_str() {
        "forward" => MoveDirection::Forward,
        "backward" => MoveDirection::Backward,
        other => bail!("unknown direction {other}"),
    };
    let id = world.task_id(&name)?;
    for _ in 0..count {
        let change = world
            .service
            .move_task(id, step)
            .wrap_err("move scenario task")?;
        world.last_change = Some(change);
    }
    Ok(())
}

#[when(r#""{name}" is deleted"#)]
fn task_is_deleted(world: &mut DependencyWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&name)?;
    world
        .service
        .delete_task(id)
        .wrap_err("delete scenario task")?;
    Ok(())
}

#[when(r#""{name}" is set to wait on "{blocker}""#)]
fn task_is_blocked_by(
    world: &mut DependencyWorld,
    name: String,
    blocker: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&name)?;
    let blocker_sequence = world.reload(&blocker)?.sequence_id();
    if let Err(err) = world.service.set_blocked_by(id, Some(blocker_sequence)) {
        world.last_error = Some(err);
    }
    Ok(())
}
