//! Database models for Taskboard
//!
//! This module contains SQLx models for users, tasks and todos, plus the
//! authenticated principal handed to resolvers.

pub mod principal;
pub mod task;
pub mod todo;
pub mod user;

pub use principal::{Principal, Scope};
pub use task::{Task, TaskStatus};
pub use todo::Todo;
pub use user::User;

use uuid::Uuid;

/// Generate an identifier for a newly created record
///
/// Identifiers are random (UUIDv4) rather than sequential so they can be
/// assigned before the row reaches the database.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
