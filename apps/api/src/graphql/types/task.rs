//! Task GraphQL type
//!
//! This module defines the GraphQL type for tasks with relationship
//! resolvers for the owning user and the task's todos.

use async_graphql::{Context, Enum, ErrorExtensions, Object, Result, ID};

use crate::graphql::context::loaders;
use crate::graphql::guards::ScopeGuard;
use crate::models::{Scope, Task as DbTask, TaskStatus};

use super::todo::Todo;
use super::user::User;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl From<TaskStatus> for Status {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => Self::Todo,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Done => Self::Done,
        }
    }
}

impl From<Status> for TaskStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Todo => Self::Todo,
            Status::InProgress => Self::InProgress,
            Status::Done => Self::Done,
        }
    }
}

/// A task owned by a user
pub struct Task {
    inner: DbTask,
}

impl Task {
    /// Create a new GraphQL Task from a database Task
    pub fn new(task: DbTask) -> Self {
        Self { inner: task }
    }
}

impl From<DbTask> for Task {
    fn from(task: DbTask) -> Self {
        Self::new(task)
    }
}

#[Object]
impl Task {
    /// Unique task identifier
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    /// Task description
    async fn text(&self) -> &str {
        &self.inner.text
    }

    /// Current workflow status
    async fn status(&self) -> Status {
        self.inner.status.into()
    }

    /// Owning user's ID
    async fn user_id(&self) -> ID {
        ID(self.inner.user_id.clone())
    }

    /// Owning user
    #[graphql(guard = "ScopeGuard::new(Scope::ReadUser)")]
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        loaders(ctx)?
            .user
            .load(self.inner.user_id.clone())
            .await
            .map(User::from)
            .map_err(|e| e.extend())
    }

    /// Checklist items of this task
    #[graphql(guard = "ScopeGuard::new(Scope::ReadTasks)")]
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        let todos = loaders(ctx)?
            .todos_by_task
            .load(self.inner.id.clone())
            .await
            .map_err(|e| e.extend())?;
        Ok(todos.into_iter().map(Todo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversions() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from(Status::from(status)), status);
        }
    }
}
