//! Unit tests for the board read model and view coordinator.


use crate::board::Board;
use crate::workflow::domain::{
    PersistedTaskData, Project, ProjectColor, ProjectDetails, SequenceId, Task, TaskId,
    TaskPriority, TaskStatus, TaskType,
};
use chrono::{DateTime, Utc};
use mockable::DefaultClock;

fn project() -> Project {
    Project::new(
        ProjectDetails {
            name: "Board".to_owned(),
            description: String::new(),
            color: ProjectColor::default(),
        },
        &DefaultClock,
    )
}

fn task(project: &Project, sequence: u32, status: TaskStatus, seconds: i64) -> Task {
    let stamp = DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).expect("valid time");
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        sequence_id: SequenceId::new(sequence).expect("non-zero sequence"),
        project_id: project.id(),
        name: format!("task {sequence}"),
        description: String::new(),
        status,
        priority: TaskPriority::Low,
        task_type: TaskType::Regular,
        blocked_by: None,
        created_at: stamp,
        updated_at: stamp,
    })
}

/// Two Not Started tasks, one In Progress, none Done.
fn sample_board() -> Board {
    let project = project();
    let tasks = vec![
        task(&project, 1, TaskStatus::NotStarted, 1),
        task(&project, 2, TaskStatus::NotStarted, 2),
        task(&project, 3, TaskStatus::InProgress, 3),
    ];
    Board::new(project, &tasks)
}
