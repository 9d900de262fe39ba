//! Scope authorization guard
//!
//! Checks the request's [`Principal`] for a required scope. A request without
//! a principal is rejected as `UNAUTHORIZED`; a principal lacking the scope is
//! rejected as `FORBIDDEN`.

use async_graphql::{Context, ErrorExtensions, Guard};
use tracing::debug;

use crate::error::ApiError;
use crate::models::{Principal, Scope};

/// Requires the caller to hold `scope`
///
/// # Example
///
/// ```ignore
/// #[Object]
/// impl TaskQuery {
///     #[graphql(guard = "ScopeGuard::new(Scope::ReadTasks)")]
///     async fn fetch_tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
///         // ...
///     }
/// }
/// ```
pub struct ScopeGuard {
    scope: Scope,
}

impl ScopeGuard {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Guard for ScopeGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        let principal = ctx
            .data_opt::<Principal>()
            .ok_or_else(|| ApiError::Unauthorized.extend())?;

        principal.require(self.scope).map_err(|e| {
            debug!(
                subject = principal.subject(),
                scope = %self.scope,
                "Missing scope for field"
            );
            e.extend()
        })
    }
}
