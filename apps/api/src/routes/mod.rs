//! HTTP route handlers for the Taskboard API
//!
//! This module contains all endpoint handlers including:
//! - The authenticated GraphQL endpoint and the playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::{graphql_router, GraphQLState};
pub use health::{health_router, HealthState};

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the application router
pub fn app_router(graphql: GraphQLState, health: HealthState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(graphql_router(graphql))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
