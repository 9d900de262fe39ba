//! Task queries
//!
//! - fetchTasks: tasks owned by the calling principal

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::error::ApiError;
use crate::graphql::context::{principal, stores};
use crate::graphql::guards::ScopeGuard;
use crate::graphql::types::Task;
use crate::models::Scope;

#[derive(Default)]
pub struct TaskQuery;

#[Object]
impl TaskQuery {
    /// Tasks owned by the authenticated user, oldest first
    #[graphql(guard = "ScopeGuard::new(Scope::ReadTasks)")]
    async fn fetch_tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let principal = principal(ctx)?;
        let tasks = stores(ctx)?
            .tasks
            .list_by_user_id(principal.subject())
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }
}
