//! Text and JSON rendering of command results.

use crate::cli::CliError;
use lanes::board::Board;
use lanes::workflow::domain::{Project, Task, TaskId};
use lanes::workflow::services::{DeletedTask, StatusChange};
use serde::Serialize;
use std::io::Write;

/// Writes command results as plain text or pretty-printed JSON.
pub struct Output<'a, W: Write> {
    out: &'a mut W,
    json: bool,
}

impl<'a, W: Write> Output<'a, W> {
    /// Wraps `out`; `json` selects the JSON encoding.
    #[must_use]
    pub const fn new(out: &'a mut W, json: bool) -> Self {
        Self { out, json }
    }

    /// Renders one project.
    pub fn project(&mut self, project: &Project) -> Result<(), CliError> {
        if self.json {
            return self.write_json(project);
        }
        writeln!(self.out, "{}", project_line(project))?;
        if !project.description().is_empty() {
            writeln!(self.out, "  {}", project.description())?;
        }
        Ok(())
    }

    /// Renders projects in list order.
    pub fn projects(&mut self, projects: &[Project]) -> Result<(), CliError> {
        if self.json {
            return self.write_json(&projects);
        }
        if projects.is_empty() {
            writeln!(self.out, "no projects")?;
        }
        for project in projects {
            writeln!(self.out, "{}", project_line(project))?;
        }
        Ok(())
    }

    /// Renders one task with its id.
    pub fn task(&mut self, task: &Task) -> Result<(), CliError> {
        if self.json {
            return self.write_json(task);
        }
        writeln!(self.out, "{}", task_line(task))?;
        writeln!(self.out, "  id: {}", task.id())?;
        if !task.description().is_empty() {
            writeln!(self.out, "  {}", task.description())?;
        }
        Ok(())
    }

    /// Renders tasks in the given order.
    pub fn tasks(&mut self, tasks: &[Task]) -> Result<(), CliError> {
        if self.json {
            return self.write_json(&tasks);
        }
        if tasks.is_empty() {
            writeln!(self.out, "no tasks")?;
        }
        for task in tasks {
            writeln!(self.out, "{}", task_line(task))?;
        }
        Ok(())
    }

    /// Renders the three board columns.
    pub fn board(&mut self, board: &Board) -> Result<(), CliError> {
        if self.json {
            return self.write_json(board);
        }
        writeln!(self.out, "{}", project_line(board.project()))?;
        for column in board.columns() {
            writeln!(
                self.out,
                "\n{} ({})",
                column.status().label(),
                column.len()
            )?;
            for task in column.tasks() {
                writeln!(self.out, "  {}", task_line(task))?;
            }
        }
        Ok(())
    }

    /// Renders a moved task and any released dependents.
    pub fn status_change(&mut self, change: &StatusChange) -> Result<(), CliError> {
        if self.json {
            return self.write_json(change);
        }
        writeln!(self.out, "{}", task_line(&change.task))?;
        self.released(&change.released)
    }

    /// Renders a deleted task and any released dependents.
    pub fn deleted(&mut self, deleted: &DeletedTask) -> Result<(), CliError> {
        if self.json {
            return self.write_json(deleted);
        }
        writeln!(
            self.out,
            "deleted {} {}",
            deleted.task.sequence_id(),
            deleted.task.name()
        )?;
        self.released(&deleted.released)
    }

    fn released(&mut self, released: &[TaskId]) -> Result<(), CliError> {
        for id in released {
            writeln!(self.out, "  unblocked {id}")?;
        }
        Ok(())
    }

    fn write_json(&mut self, value: &impl Serialize) -> Result<(), CliError> {
        serde_json::to_writer_pretty(&mut *self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn project_line(project: &Project) -> String {
    format!("{}  {}  {}", project.id(), project.color(), project.name())
}

/// Formats a task as `#3 [In Progress] name (high bug) blocked by #1`.
#[must_use]
pub fn task_line(task: &Task) -> String {
    let blocker = task
        .blocked_by()
        .map(|sequence| format!(" blocked by {sequence}"))
        .unwrap_or_default();
    format!(
        "{} [{}] {} ({} {}){blocker}",
        task.sequence_id(),
        task.status().label(),
        task.name(),
        task.priority(),
        task.task_type()
    )
}
