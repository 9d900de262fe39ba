//! GraphQL schema and resolvers for Taskboard
//!
//! This module contains the async-graphql schema including:
//! - Query and mutation resolvers for users, tasks and todos
//! - Object types whose relationship fields go through batch loaders
//! - The per-request batch loader registry and its dispatcher
//! - Scope guards for authorization

pub mod context;
pub mod guards;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use context::prepare_request;
pub use loaders::{LoadError, Loaders};
pub use schema::{build_schema, SchemaBuilder, TaskboardSchema};
