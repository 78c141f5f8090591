//! Kanban task workflow.
//!
//! The domain layer owns the status cycle, column ordering and blocking
//! rules. Ports describe persistence, adapters provide in-memory and
//! `SQLite` storage, and [`services::WorkflowService`] ties them together.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
