//! Task mutations
//!
//! - createTask: create a task owned by the caller
//! - updateTask: change a task's text and/or status

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, ID};

use super::{owned_task, validate_text, MAX_TEXT_LENGTH};
use crate::error::ApiError;
use crate::graphql::context::{principal, stores};
use crate::graphql::guards::ScopeGuard;
use crate::graphql::types::{Status, Task};
use crate::models::task::TaskChanges;
use crate::models::{Scope, Task as DbTask};

/// Input for creating a task
#[derive(Debug, Clone, InputObject)]
pub struct CreateTaskInput {
    pub text: String,
}

/// Input for updating a task; omitted fields are left unchanged
#[derive(Debug, Clone, InputObject)]
pub struct UpdateTaskInput {
    pub id: ID,
    pub text: Option<String>,
    pub status: Option<Status>,
}

#[derive(Default)]
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    /// Create a new task in the TODO state
    ///
    /// # Errors
    /// - NOT_FOUND if the caller has not created their user yet
    /// - VALIDATION_ERROR if the text is blank or too long
    #[graphql(guard = "ScopeGuard::new(Scope::WriteTasks)")]
    async fn create_task(&self, ctx: &Context<'_>, input: CreateTaskInput) -> Result<Task> {
        let principal = principal(ctx)?;
        let stores = stores(ctx)?;
        let text = validate_text("text", &input.text, MAX_TEXT_LENGTH).map_err(|e| e.extend())?;

        let owner = stores
            .users
            .get(principal.subject())
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        if owner.is_none() {
            return Err(ApiError::not_found("user", principal.subject()).extend());
        }

        let task = stores
            .tasks
            .store(&DbTask::new(text, principal.subject()))
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(task_id = %task.id, user_id = %task.user_id, "Task created");
        Ok(Task::from(task))
    }

    /// Update a task owned by the caller
    #[graphql(guard = "ScopeGuard::new(Scope::WriteTasks)")]
    async fn update_task(&self, ctx: &Context<'_>, input: UpdateTaskInput) -> Result<Task> {
        let principal = principal(ctx)?;
        let stores = stores(ctx)?;

        let text = input
            .text
            .as_deref()
            .map(|text| validate_text("text", text, MAX_TEXT_LENGTH))
            .transpose()
            .map_err(|e| e.extend())?;

        let mut task = owned_task(stores, principal, &input.id)
            .await
            .map_err(|e| e.extend())?;

        TaskChanges {
            text,
            status: input.status.map(Into::into),
        }
        .apply(&mut task);

        let task = stores
            .tasks
            .store(&task)
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::debug!(task_id = %task.id, status = %task.status, "Task updated");
        Ok(Task::from(task))
    }
}
