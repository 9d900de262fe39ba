//! User queries
//!
//! - fetchUser: the calling principal's profile

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::error::ApiError;
use crate::graphql::context::{principal, stores};
use crate::graphql::guards::ScopeGuard;
use crate::graphql::types::User;
use crate::models::Scope;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Get the currently authenticated user
    ///
    /// Returns null until the user has been created with `createUser`.
    #[graphql(guard = "ScopeGuard::new(Scope::ReadUser)")]
    async fn fetch_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let principal = principal(ctx)?;
        let user = stores(ctx)?
            .users
            .get(principal.subject())
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        Ok(user.map(User::from))
    }
}
