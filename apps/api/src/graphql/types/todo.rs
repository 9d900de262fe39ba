//! Todo GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::graphql::context::loaders;
use crate::graphql::guards::ScopeGuard;
use crate::models::{Scope, Todo as DbTodo};

use super::task::Task;

/// A checklist item belonging to a task
pub struct Todo {
    inner: DbTodo,
}

impl Todo {
    /// Create a new GraphQL Todo from a database Todo
    pub fn new(todo: DbTodo) -> Self {
        Self { inner: todo }
    }
}

impl From<DbTodo> for Todo {
    fn from(todo: DbTodo) -> Self {
        Self::new(todo)
    }
}

#[Object]
impl Todo {
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    async fn text(&self) -> &str {
        &self.inner.text
    }

    /// Whether the item has been checked off
    async fn done(&self) -> bool {
        self.inner.done
    }

    /// Parent task's ID
    async fn task_id(&self) -> ID {
        ID(self.inner.task_id.clone())
    }

    /// Parent task
    #[graphql(guard = "ScopeGuard::new(Scope::ReadTasks)")]
    async fn task(&self, ctx: &Context<'_>) -> Result<Task> {
        loaders(ctx)?
            .task
            .load(self.inner.task_id.clone())
            .await
            .map(Task::from)
            .map_err(|e| e.extend())
    }
}
