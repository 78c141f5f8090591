//! Given steps for task dependency scenarios.

use super::world::DependencyWorld;
use eyre::WrapErr;
use lanes::workflow::services::{CreateProjectRequest, CreateTaskRequest};
use rstest_bdd_macros::given;

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut DependencyWorld, name: String) -> Result<(), eyre::Report> {
    let project = world
        .service
        .create_project(CreateProjectRequest::new(name))
        .wrap_err("create scenario project")?;
    world.project_id = Some(project.id());
    Ok(())
}

#[given(r#"a task named "{name}""#)]
fn a_task(world: &mut DependencyWorld, name: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.project()?, name.clone());
    let task = world
        .service
        .create_task(request)
        .wrap_err("create scenario task")?;
    world.tasks.insert(name, task.id());
    Ok(())
}

#[given(r#"a task "{name}" waiting on "{blocker}""#)]
fn a_blocked_task(
    world: &mut DependencyWorld,
    name: String,
    blocker: String,
) -> Result<(), eyre::Report> {
    let blocker_sequence = world.reload(&blocker)?.sequence_id();
    let request = CreateTaskRequest::new(world.project()?, name.clone()).blocked_by(blocker_sequence);
    let task = world
        .service
        .create_task(request)
        .wrap_err("create blocked scenario task")?;
    world.tasks.insert(name, task.id());
    Ok(())
}
