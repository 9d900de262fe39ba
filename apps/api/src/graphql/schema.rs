//! GraphQL schema builder for the Taskboard API
//!
//! This module provides the schema construction for the async-graphql API.
//! The schema holds the stores; the principal and loaders are attached to
//! each request by [`prepare_request`](super::context::prepare_request).

use async_graphql::{EmptySubscription, Schema};

use crate::repositories::Stores;

use super::mutation::Mutation;
use super::query::Query;

/// The Taskboard GraphQL schema type
pub type TaskboardSchema = Schema<Query, Mutation, EmptySubscription>;

/// Default maximum query depth
///
/// User and Task reference each other, so unbounded nesting is possible.
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// Builder for constructing the GraphQL schema
pub struct SchemaBuilder {
    stores: Stores,
    max_depth: usize,
}

impl SchemaBuilder {
    /// Create a new schema builder backed by `stores`
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum query depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the schema
    pub fn build(self) -> TaskboardSchema {
        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(self.stores)
            .limit_depth(self.max_depth)
            .finish()
    }
}

/// Create a new GraphQL schema with default limits
pub fn build_schema(stores: Stores) -> TaskboardSchema {
    SchemaBuilder::new(stores).build()
}
