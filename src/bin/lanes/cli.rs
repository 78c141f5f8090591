//! Argument definitions and command dispatch.

use crate::output::Output;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use clap::{Args, Parser, Subcommand};
use lanes::config::{self, AppConfig, ConfigError};
use lanes::workflow::{
    adapters::sqlite::{OpenStoreError, SqliteWorkflowStore},
    domain::{
        MoveDirection, ParseTaskPriorityError, ParseTaskStatusError, ParseTaskTypeError,
        ProjectId, SequenceId, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskType,
    },
    services::{
        CreateProjectRequest, CreateTaskRequest, UpdateProjectRequest, UpdateTaskRequest,
        WorkflowError, WorkflowService,
    },
};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const MEMORY_DATABASE: &str = ":memory:";

type Service = WorkflowService<SqliteWorkflowStore, SqliteWorkflowStore, DefaultClock>;

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The database could not be opened.
    #[error(transparent)]
    Store(#[from] OpenStoreError),
    /// A workflow operation failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    /// An argument failed domain validation.
    #[error(transparent)]
    Invalid(#[from] TaskDomainError),
    /// No database location could be determined.
    #[error("no database path configured and no platform data directory is available")]
    NoDatabasePath,
    /// The database directory could not be created.
    #[error("failed to create data directory '{path}': {source}")]
    DataDir {
        /// Directory path.
        path: Utf8PathBuf,
        /// Creation failure.
        #[source]
        source: io::Error,
    },
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Personal kanban task workflow.
#[derive(Debug, Parser)]
#[command(name = "lanes", version, about)]
pub struct Cli {
    /// Config file path.
    #[arg(long, global = true, env = "LANES_CONFIG")]
    pub config: Option<Utf8PathBuf>,
    /// `SQLite` database path, or `:memory:`.
    #[arg(long, global = true, env = "LANES_DATABASE")]
    pub database: Option<Utf8PathBuf>,
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage projects.
    Project {
        /// Project command.
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Manage tasks.
    Task {
        /// Task command.
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Show a project's board.
    Board {
        /// Project identifier.
        project: Uuid,
    },
    /// List a project's tasks in one status.
    Tasks {
        /// Project identifier.
        project: Uuid,
        /// Status column.
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },
}

/// Project commands.
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project.
    Add {
        /// Project name.
        name: String,
        /// Project description.
        #[arg(long)]
        description: Option<String>,
        /// Display colour as `#rrggbb`.
        #[arg(long)]
        color: Option<String>,
    },
    /// List projects, oldest first.
    List,
    /// Edit a project.
    Edit {
        /// Project identifier.
        id: Uuid,
        /// Fields to change.
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Delete a project and its tasks.
    Rm {
        /// Project identifier.
        id: Uuid,
    },
}

/// Editable project fields.
#[derive(Debug, Args)]
pub struct ProjectFields {
    /// New name.
    #[arg(long)]
    pub name: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New colour.
    #[arg(long)]
    pub color: Option<String>,
}

/// Task commands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a task.
    Add {
        /// Project identifier.
        project: Uuid,
        /// Task name.
        name: String,
        /// Task description.
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high.
        #[arg(long, value_parser = parse_priority)]
        priority: Option<TaskPriority>,
        /// Type: regular, bug or feature.
        #[arg(long = "type", value_parser = parse_type)]
        task_type: Option<TaskType>,
        /// Sequence number of the blocking task.
        #[arg(long)]
        blocked_by: Option<u32>,
    },
    /// Show one task.
    Show {
        /// Task identifier.
        id: Uuid,
    },
    /// Edit a task's text, priority or type.
    Edit {
        /// Task identifier.
        id: Uuid,
        /// Fields to change.
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Block a task on another task of its project.
    Block {
        /// Task identifier.
        id: Uuid,
        /// Sequence number of the blocking task.
        sequence: u32,
    },
    /// Clear a task's blocker.
    Unblock {
        /// Task identifier.
        id: Uuid,
    },
    /// Move a task forward one status.
    Next {
        /// Task identifier.
        id: Uuid,
    },
    /// Move a task back one status.
    Prev {
        /// Task identifier.
        id: Uuid,
    },
    /// Delete a task.
    Rm {
        /// Task identifier.
        id: Uuid,
    },
    /// List tasks that may block another task.
    Candidates {
        /// Project identifier.
        project: Uuid,
        /// Task being edited, excluded from the list.
        #[arg(long = "for")]
        for_task: Option<Uuid>,
    },
}

/// Editable task fields.
#[derive(Debug, Args)]
pub struct TaskFields {
    /// New name.
    #[arg(long)]
    pub name: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New priority.
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<TaskPriority>,
    /// New type.
    #[arg(long = "type", value_parser = parse_type)]
    pub task_type: Option<TaskType>,
}

/// Accepts any case, `-` or space separators, and the `todo`/`doing` aliases.
fn parse_status(raw: &str) -> Result<TaskStatus, ParseTaskStatusError> {
    let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    match normalized.as_str() {
        "todo" => Ok(TaskStatus::NotStarted),
        "doing" => Ok(TaskStatus::InProgress),
        canonical => {
            TaskStatus::try_from(canonical).map_err(|_| ParseTaskStatusError(raw.to_owned()))
        }
    }
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ParseTaskPriorityError> {
    TaskPriority::try_from(raw)
}

fn parse_type(raw: &str) -> Result<TaskType, ParseTaskTypeError> {
    TaskType::try_from(raw)
}

/// Runs `cli`, writing results to `out`.
///
/// # Errors
///
/// Returns [`CliError`] when configuration, storage or the operation fails.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let Cli {
        config,
        database,
        json,
        command,
    } = cli;
    let app_config = load_config(config)?;
    let service = open_service(database, &app_config)?;
    let mut output = Output::new(out, json);

    match command {
        Command::Project { command: project } => run_project(&service, &mut output, project),
        Command::Task { command: task } => run_task(&service, &mut output, task),
        Command::Board { project } => {
            let board = service.board(ProjectId::from_uuid(project))?;
            output.board(&board)
        }
        Command::Tasks { project, status } => {
            let tasks = service.get_tasks_by_status(ProjectId::from_uuid(project), status)?;
            output.tasks(&tasks)
        }
    }
}

fn run_project(
    service: &Service,
    output: &mut Output<'_, impl Write>,
    command: ProjectCommand,
) -> Result<(), CliError> {
    match command {
        ProjectCommand::Add {
            name,
            description,
            color,
        } => {
            let mut request = CreateProjectRequest::new(name);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            if let Some(hex) = color {
                request = request.with_color(hex);
            }
            output.project(&service.create_project(request)?)
        }
        ProjectCommand::List => output.projects(&service.list_projects()?),
        ProjectCommand::Edit { id, fields } => {
            let mut request = UpdateProjectRequest::new(ProjectId::from_uuid(id));
            if let Some(name) = fields.name {
                request = request.with_name(name);
            }
            if let Some(text) = fields.description {
                request = request.with_description(text);
            }
            if let Some(hex) = fields.color {
                request = request.with_color(hex);
            }
            output.project(&service.update_project(request)?)
        }
        ProjectCommand::Rm { id } => {
            output.project(&service.delete_project(ProjectId::from_uuid(id))?)
        }
    }
}

fn run_task(
    service: &Service,
    output: &mut Output<'_, impl Write>,
    command: TaskCommand,
) -> Result<(), CliError> {
    match command {
        TaskCommand::Add {
            project,
            name,
            description,
            priority,
            task_type,
            blocked_by,
        } => {
            let mut request = CreateTaskRequest::new(ProjectId::from_uuid(project), name);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            if let Some(value) = priority {
                request = request.with_priority(value);
            }
            if let Some(value) = task_type {
                request = request.with_type(value);
            }
            if let Some(sequence) = blocked_by {
                request = request.blocked_by(SequenceId::new(sequence)?);
            }
            output.task(&service.create_task(request)?)
        }
        TaskCommand::Show { id } => output.task(&service.get_task(TaskId::from_uuid(id))?),
        TaskCommand::Edit { id, fields } => {
            let mut request = UpdateTaskRequest::new(TaskId::from_uuid(id));
            if let Some(name) = fields.name {
                request = request.with_name(name);
            }
            if let Some(text) = fields.description {
                request = request.with_description(text);
            }
            if let Some(value) = fields.priority {
                request = request.with_priority(value);
            }
            if let Some(value) = fields.task_type {
                request = request.with_type(value);
            }
            output.task(&service.update_task(request)?)
        }
        TaskCommand::Block { id, sequence } => {
            let blocker = SequenceId::new(sequence)?;
            output.task(&service.set_blocked_by(TaskId::from_uuid(id), Some(blocker))?)
        }
        TaskCommand::Unblock { id } => {
            output.task(&service.set_blocked_by(TaskId::from_uuid(id), None)?)
        }
        TaskCommand::Next { id } => {
            let change = service.move_task(TaskId::from_uuid(id), MoveDirection::Forward)?;
            output.status_change(&change)
        }
        TaskCommand::Prev { id } => {
            let change = service.move_task(TaskId::from_uuid(id), MoveDirection::Backward)?;
            output.status_change(&change)
        }
        TaskCommand::Rm { id } => output.deleted(&service.delete_task(TaskId::from_uuid(id))?),
        TaskCommand::Candidates { project, for_task } => {
            let candidates = service.blocker_candidates(
                ProjectId::from_uuid(project),
                for_task.map(TaskId::from_uuid),
            )?;
            output.tasks(&candidates)
        }
    }
}

fn load_config(path: Option<Utf8PathBuf>) -> Result<AppConfig, CliError> {
    match path {
        Some(explicit) => Ok(AppConfig::load(&explicit)?),
        None => match config::default_config_path() {
            Some(default) => Ok(AppConfig::load_or_default(&default)?),
            None => Ok(AppConfig::default()),
        },
    }
}

fn open_service(database: Option<Utf8PathBuf>, app_config: &AppConfig) -> Result<Service, CliError> {
    let path = database
        .or_else(|| app_config.database.resolve())
        .ok_or(CliError::NoDatabasePath)?;
    if path.as_str() != MEMORY_DATABASE {
        ensure_parent_dir(&path)?;
    }
    debug!(%path, "opening database");
    let store = Arc::new(SqliteWorkflowStore::open(path.as_str())?);
    Ok(WorkflowService::with_config(
        Arc::clone(&store),
        store,
        Arc::new(DefaultClock),
        app_config.workflow(),
    ))
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), CliError> {
    let Some(parent) = path.parent().filter(|dir| !dir.as_str().is_empty()) else {
        return Ok(());
    };
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|source| CliError::DataDir {
        path: parent.to_owned(),
        source,
    })
}
