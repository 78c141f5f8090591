//! Lanes: a personal kanban task workflow engine.
//!
//! Tasks belong to projects and move around a closed three-state cycle
//! (Not Started, In Progress, Done). Each status column has a deterministic
//! order, and a task may be blocked by one other task of its project. When a
//! blocker reaches Done or is deleted, its direct dependents are released in
//! the same write.
//!
//! # Architecture
//!
//! Lanes follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Synchronous repository traits
//! - **Adapters**: In-memory and `SQLite` implementations of the ports
//! - **Services**: Orchestration that validates input and applies changesets
//!
//! # Modules
//!
//! - [`workflow`]: Task and project lifecycle, ordering and dependencies
//! - [`board`]: Board read model and modal view state
//! - [`config`]: TOML configuration loading

pub mod board;
pub mod config;
pub mod workflow;
