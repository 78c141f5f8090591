//! Diesel schema for workflow persistence.

/// DDL applied when a store is opened. Every statement is idempotent.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

diesel::table! {
    /// Projects owning kanban tasks.
    projects (id) {
        /// Project identifier (UUID text).
        id -> Text,
        /// Project name.
        name -> Text,
        /// Project description.
        description -> Text,
        /// Display colour as `#rrggbb`.
        color -> Text,
        /// Creation timestamp in Unix nanoseconds.
        created_at -> BigInt,
        /// Last update timestamp in Unix nanoseconds.
        updated_at -> BigInt,
    }
}

diesel::table! {
    /// Kanban tasks.
    tasks (id) {
        /// Task identifier (UUID text).
        id -> Text,
        /// Store-wide sequence identifier used by blocker references.
        sequence_id -> BigInt,
        /// Owning project identifier.
        project_id -> Text,
        /// Task name.
        name -> Text,
        /// Task description.
        description -> Text,
        /// Workflow status.
        status -> Text,
        /// Priority rank, higher first.
        priority -> Integer,
        /// Classification tag.
        task_type -> Text,
        /// Sequence identifier of the blocking task.
        blocked_by -> Nullable<BigInt>,
        /// Creation timestamp in Unix nanoseconds.
        created_at -> BigInt,
        /// Last update timestamp in Unix nanoseconds.
        updated_at -> BigInt,
    }
}

diesel::table! {
    /// Single-row counter backing sequence identifier allocation.
    task_sequence (id) {
        /// Always `1`.
        id -> Integer,
        /// Last allocated sequence identifier.
        last_value -> BigInt,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
