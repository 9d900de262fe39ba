//! User mutations
//!
//! - createUser: register (or rename) the calling principal

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result};

use super::{validate_text, MAX_NAME_LENGTH};
use crate::error::ApiError;
use crate::graphql::context::{principal, stores};
use crate::graphql::guards::ScopeGuard;
use crate::graphql::types::User;
use crate::models::{Scope, User as DbUser};

/// Input for creating the caller's user record
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    /// Display name
    pub name: String,
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create the user record for the authenticated principal
    ///
    /// The user's ID is the token subject. Calling this again updates the
    /// name of the existing record.
    #[graphql(guard = "ScopeGuard::new(Scope::WriteUser)")]
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        let principal = principal(ctx)?;
        let name = validate_text("name", &input.name, MAX_NAME_LENGTH).map_err(|e| e.extend())?;

        let user = stores(ctx)?
            .users
            .store(&DbUser::new(principal.subject(), name))
            .await
            .map_err(|e| ApiError::from(e).extend())?;

        tracing::info!(user_id = %user.id, "User stored");
        Ok(User::from(user))
    }
}
