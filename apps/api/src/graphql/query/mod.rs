//! GraphQL queries for the Taskboard API
//!
//! This module contains all query resolvers, organized by domain.

mod task;
mod user;

pub use task::TaskQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(TaskQuery, UserQuery);
