//! Shared SQL fragments for repositories
//!
//! These constants define the column lists for each entity, keeping the
//! SELECT and RETURNING clauses consistent across queries.

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, created_at, updated_at";

/// SQL columns for task queries
pub const TASK_COLUMNS: &str = "id, text, status, user_id, created_at, updated_at";

/// SQL columns for todo queries
pub const TODO_COLUMNS: &str = "id, text, done, task_id, created_at, updated_at";
