//! Task model for Taskboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Task status enum matching PostgreSQL task_status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All valid statuses, in workflow order
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ApiError::ValidationError(format!("{} is not a valid Status", s)))
    }
}

/// Task record from the tasks table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Task {
    /// Server-generated identifier
    pub id: String,

    /// Free-text body
    pub text: String,

    /// Workflow status
    pub status: TaskStatus,

    /// Owning user
    pub user_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the `TODO` state with a fresh identifier
    pub fn new(text: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            text: text.into(),
            status: TaskStatus::Todo,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a task; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub text: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    /// Apply the provided fields to a task, bumping `updated_at` if anything changed
    pub fn apply(self, task: &mut Task) {
        let mut touched = false;
        if let Some(text) = self.text {
            task.text = text;
            touched = true;
        }
        if let Some(status) = self.status {
            task.status = status;
            touched = true;
        }
        if touched {
            task.updated_at = Utc::now();
        }
    }
}
