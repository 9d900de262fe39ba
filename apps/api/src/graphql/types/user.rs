//! User GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::graphql::context::loaders;
use crate::graphql::guards::ScopeGuard;
use crate::models::{Scope, User as DbUser};

use super::task::Task;

/// A registered user, identified by their token subject
pub struct User {
    inner: DbUser,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.inner.id.clone())
    }

    /// Display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Tasks owned by this user
    #[graphql(guard = "ScopeGuard::new(Scope::ReadTasks)")]
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let tasks = loaders(ctx)?
            .tasks_by_user
            .load(self.inner.id.clone())
            .await
            .map_err(|e| e.extend())?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }
}
