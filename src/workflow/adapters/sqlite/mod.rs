//! `SQLite` adapters for workflow persistence.
//!
//! One [`SqliteWorkflowStore`] implements both the task and project ports
//! over a single-connection r2d2 pool. Multi-row writes run inside one
//! transaction.

mod models;
mod projects;
mod schema;
mod store;
mod tasks;

pub use store::{OpenStoreError, SqliteWorkflowStore, WorkflowPool};
