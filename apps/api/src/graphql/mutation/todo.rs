//! Todo mutations
//!
//! - createTodo: add an unchecked todo to one of the caller's tasks
//! - updateTodo: change a todo's text and/or done flag

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, ID};

use super::{owned_task, validate_text, MAX_TEXT_LENGTH};
use crate::error::ApiError;
use crate::graphql::context::{principal, stores};
use crate::graphql::guards::ScopeGuard;
use crate::graphql::types::Todo;
use crate::models::todo::TodoChanges;
use crate::models::{Scope, Todo as DbTodo};

/// Input for creating a todo
#[derive(Debug, Clone, InputObject)]
pub struct CreateTodoInput {
    pub text: String,
    /// Parent task, which must belong to the caller
    pub task_id: ID,
}

/// Input for updating a todo; omitted fields are left unchanged
#[derive(Debug, Clone, InputObject)]
pub struct UpdateTodoInput {
    pub id: ID,
    pub text: Option<String>,
    pub done: Option<bool>,
}

#[derive(Default)]
pub struct TodoMutation;

#[Object]
impl TodoMutation {
    /// Create a todo under an existing task
    #[graphql(guard = "ScopeGuard::new(Scope::WriteTasks)")]
    async fn create_todo(&self, ctx: &Context<'_>, input: CreateTodoInput) -> Result<Todo> {
        let principal = principal(ctx)?;
        let stores = stores(ctx)?;
        let text = validate_text("text", &input.text, MAX_TEXT_LENGTH).map_err(|e| e.extend())?;

        let task = owned_task(stores, principal, &input.task_id)
            .await
            .map_err(|e| e.extend())?;

        let todo = stores
            .todos
            .store(&DbTodo::new(text, task.id))
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(todo_id = %todo.id, task_id = %todo.task_id, "Todo created");
        Ok(Todo::from(todo))
    }

    /// Update a todo on one of the caller's tasks
    #[graphql(guard = "ScopeGuard::new(Scope::WriteTasks)")]
    async fn update_todo(&self, ctx: &Context<'_>, input: UpdateTodoInput) -> Result<Todo> {
        let principal = principal(ctx)?;
        let stores = stores(ctx)?;

        let text = input
            .text
            .as_deref()
            .map(|text| validate_text("text", text, MAX_TEXT_LENGTH))
            .transpose()
            .map_err(|e| e.extend())?;

        let mut todo = stores
            .todos
            .get(&input.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .ok_or_else(|| ApiError::not_found("todo", input.id.as_str()).extend())?;

        // Todos on someone else's task are as invisible as the task itself
        match owned_task(stores, principal, &todo.task_id).await {
            Ok(_) => {}
            Err(ApiError::NotFound { .. }) => {
                return Err(ApiError::not_found("todo", input.id.as_str()).extend())
            }
            Err(e) => return Err(e.extend()),
        }

        TodoChanges {
            text,
            done: input.done,
        }
        .apply(&mut todo);

        let todo = stores
            .todos
            .store(&todo)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::debug!(todo_id = %todo.id, done = todo.done, "Todo updated");
        Ok(Todo::from(todo))
    }
}
