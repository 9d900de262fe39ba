//! Authenticated principal
//!
//! The identity provider's token is verified once at the HTTP boundary and
//! reduced to a [`Principal`]; resolvers only ever see this typed value.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ApiError;

/// Permission granted through the token's `scope` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    ReadTasks,
    WriteTasks,
    ReadUser,
    WriteUser,
}

impl Scope {
    /// Scope string as it appears in the token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadTasks => "read:tasks",
            Self::WriteTasks => "write:tasks",
            Self::ReadUser => "read:user",
            Self::WriteUser => "write:user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims this server reads from a verified access token
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject (user identifier at the issuer)
    pub sub: String,

    /// Space-delimited granted scopes
    #[serde(default)]
    pub scope: String,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

/// The caller of a GraphQL operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    scopes: BTreeSet<String>,
}

impl Principal {
    /// Build a principal from a subject and a space-delimited scope string
    pub fn new(subject: impl Into<String>, scope: &str) -> Self {
        Self {
            subject: subject.into(),
            scopes: scope.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Subject identifier, also used as the user id
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Whether the principal was granted `scope`
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(scope.as_str())
    }

    /// Fail with [`ApiError::Forbidden`] unless `scope` was granted
    pub fn require(&self, scope: Scope) -> Result<(), ApiError> {
        if self.has_scope(scope) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("invalid scope: {} required", scope)))
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, &claims.scope)
    }
}
