//! Board read model and view state.
//!
//! [`Board`] is the in-memory query path: one fetch of a project's tasks,
//! split per status and ordered in memory. [`ViewCoordinator`] tracks which
//! view of the board has focus.

mod columns;
mod view;

pub use columns::{Board, BoardColumn};
pub use view::{Cursor, DeleteTarget, Navigation, View, ViewCoordinator, ViewError};

#[cfg(test)]
mod tests;
