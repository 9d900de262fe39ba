//! Todo model for Taskboard
//!
//! A todo is a checklist item belonging to a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Todo record from the todos table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Todo {
    /// Server-generated identifier
    pub id: String,

    /// Free-text body
    pub text: String,

    /// Completion flag
    pub done: bool,

    /// Owning task
    pub task_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new, not yet completed todo with a fresh identifier
    pub fn new(text: impl Into<String>, task_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            text: text.into(),
            done: false,
            task_id: task_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a todo; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub done: Option<bool>,
}

impl TodoChanges {
    /// Apply the provided fields to a todo, bumping `updated_at` if anything changed
    pub fn apply(self, todo: &mut Todo) {
        let mut touched = false;
        if let Some(text) = self.text {
            todo.text = text;
            touched = true;
        }
        if let Some(done) = self.done {
            todo.done = done;
            touched = true;
        }
        if touched {
            todo.updated_at = Utc::now();
        }
    }
}
