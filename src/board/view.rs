//! Modal view state for a board front end.
//!
//! A single [`View`] value replaces independent "form open", "search open"
//! and "confirm open" flags, so two modal views can never be active at once.
//! Errors overlay whatever is showing and hand it back when dismissed.

use super::Board;
use crate::workflow::domain::{ProjectId, Task, TaskId, TaskStatus};
use thiserror::Error;
use tracing::debug;

/// Entity a delete confirmation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A task.
    Task(TaskId),
    /// A project and all of its tasks.
    Project(ProjectId),
}

/// The view currently in front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// The board itself; no modal is open.
    #[default]
    Board,
    /// Task creation (`None`) or editing form.
    TaskForm {
        /// Task being edited.
        editing: Option<TaskId>,
    },
    /// Project creation (`None`) or editing form.
    ProjectForm {
        /// Project being edited.
        editing: Option<ProjectId>,
    },
    /// Task search.
    Search {
        /// Current query text.
        query: String,
    },
    /// Delete confirmation.
    ConfirmDelete {
        /// Entity to delete on confirmation.
        target: DeleteTarget,
    },
    /// Project switcher.
    ProjectPicker,
    /// Error message shown over `resume`.
    Error {
        /// Message to display.
        message: String,
        /// View restored on dismissal.
        resume: Box<View>,
    },
}

impl View {
    /// Returns a short name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::TaskForm { .. } => "task form",
            Self::ProjectForm { .. } => "project form",
            Self::Search { .. } => "search",
            Self::ConfirmDelete { .. } => "delete confirmation",
            Self::ProjectPicker => "project picker",
            Self::Error { .. } => "error",
        }
    }

    /// Returns `true` for views that open over the board.
    #[must_use]
    pub const fn is_modal(&self) -> bool {
        !matches!(self, Self::Board | Self::Error { .. })
    }
}

/// Rejected view transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A modal view is already open.
    #[error("cannot open {requested} while {current} is open")]
    Busy {
        /// View in front.
        current: &'static str,
        /// View that was requested.
        requested: &'static str,
    },
    /// Only modal views may be opened.
    #[error("{0} is not a modal view")]
    NotModal(&'static str),
    /// There is no modal view to close.
    #[error("no modal view is open")]
    NothingOpen,
    /// An error is showing and must be dismissed first.
    #[error("an error is showing")]
    ErrorShowing,
}

/// One board navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Previous column.
    Left,
    /// Next column.
    Right,
    /// Previous row.
    Up,
    /// Next row.
    Down,
}

/// Selected cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    status: TaskStatus,
    row: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// Creates a cursor on the first Not Started row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: TaskStatus::NotStarted,
            row: 0,
        }
    }

    /// Returns the selected column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the selected row.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Applies one navigation step, keeping the cursor inside `board`.
    ///
    /// Columns do not wrap.
    pub fn step(&mut self, navigation: Navigation, board: &Board) {
        match navigation {
            Navigation::Left => {
                self.status = match self.status {
                    TaskStatus::NotStarted | TaskStatus::InProgress => TaskStatus::NotStarted,
                    TaskStatus::Done => TaskStatus::InProgress,
                };
            }
            Navigation::Right => {
                self.status = match self.status {
                    TaskStatus::NotStarted => TaskStatus::InProgress,
                    TaskStatus::InProgress | TaskStatus::Done => TaskStatus::Done,
                };
            }
            Navigation::Up => self.row = self.row.saturating_sub(1),
            Navigation::Down => self.row = self.row.saturating_add(1),
        }
        self.clamp(board);
    }

    /// Pulls the row back inside the selected column.
    pub fn clamp(&mut self, board: &Board) {
        let len = board.column(self.status).len();
        self.row = self.row.min(len.saturating_sub(1));
    }

    /// Returns the task under the cursor, if the column is not empty.
    #[must_use]
    pub fn selected<'a>(&self, board: &'a Board) -> Option<&'a Task> {
        board.column(self.status).tasks().get(self.row)
    }
}

/// Owner of the front view and the board cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCoordinator {
    view: View,
    cursor: Cursor,
}

impl ViewCoordinator {
    /// Creates a coordinator showing the board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view in front.
    #[must_use]
    pub const fn current(&self) -> &View {
        &self.view
    }

    /// Returns the board cursor.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Opens a modal view over the board.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotModal`] for [`View::Board`] and
    /// [`View::Error`], [`ViewError::ErrorShowing`] while an error is
    /// displayed, or [`ViewError::Busy`] when another modal is open.
    pub fn open(&mut self, view: View) -> Result<(), ViewError> {
        if !view.is_modal() {
            return Err(ViewError::NotModal(view.name()));
        }
        match &self.view {
            View::Board => {}
            View::Error { .. } => return Err(ViewError::ErrorShowing),
            current => {
                return Err(ViewError::Busy {
                    current: current.name(),
                    requested: view.name(),
                });
            }
        }
        debug!(view = view.name(), "opened view");
        self.view = view;
        Ok(())
    }

    /// Closes the open modal and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NothingOpen`] on the board, or
    /// [`ViewError::ErrorShowing`] while an error is displayed.
    pub fn close(&mut self) -> Result<View, ViewError> {
        match self.view {
            View::Board => return Err(ViewError::NothingOpen),
            View::Error { .. } => return Err(ViewError::ErrorShowing),
            _ => {}
        }
        Ok(std::mem::take(&mut self.view))
    }

    /// Replaces the text of an open search.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NothingOpen`] when search is not in front.
    pub fn set_search_query(&mut self, text: impl Into<String>) -> Result<(), ViewError> {
        match &mut self.view {
            View::Search { query } => {
                *query = text.into();
                Ok(())
            }
            _ => Err(ViewError::NothingOpen),
        }
    }

    /// Shows an error over the current view.
    ///
    /// A second error replaces the message and keeps the original view to
    /// resume.
    pub fn show_error(&mut self, text: impl Into<String>) {
        let resume = match std::mem::take(&mut self.view) {
            View::Error { resume, .. } => resume,
            other => Box::new(other),
        };
        self.view = View::Error {
            message: text.into(),
            resume,
        };
    }

    /// Dismisses the error and restores the view it covered.
    ///
    /// Returns the dismissed message.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NothingOpen`] when no error is showing.
    pub fn dismiss_error(&mut self) -> Result<String, ViewError> {
        match std::mem::take(&mut self.view) {
            View::Error { message, resume } => {
                self.view = *resume;
                Ok(message)
            }
            other => {
                self.view = other;
                Err(ViewError::NothingOpen)
            }
        }
    }

    /// Moves the cursor when the board is in front.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Busy`] or [`ViewError::ErrorShowing`] when
    /// another view has focus.
    pub fn navigate(&mut self, navigation: Navigation, board: &Board) -> Result<(), ViewError> {
        match &self.view {
            View::Board => {
                self.cursor.step(navigation, board);
                Ok(())
            }
            View::Error { .. } => Err(ViewError::ErrorShowing),
            current => Err(ViewError::Busy {
                current: current.name(),
                requested: View::Board.name(),
            }),
        }
    }

    /// Re-clamps the cursor after the board was rebuilt.
    pub fn refresh(&mut self, board: &Board) {
        self.cursor.clamp(board);
    }
}
