//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - authenticated GraphQL endpoint
//! - `GET /graphql/playground` and `GET /` - GraphQL Playground

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::graphql::{prepare_request, TaskboardSchema};
use crate::middleware::AuthPrincipal;
use crate::repositories::Stores;
use crate::services::TokenVerifier;

/// Shared state for the GraphQL endpoint
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: TaskboardSchema,
    pub stores: Stores,
    pub verifier: Arc<TokenVerifier>,
    /// Deadline after which in-flight loads are cancelled
    pub request_timeout: Duration,
}

impl FromRef<GraphQLState> for Arc<TokenVerifier> {
    fn from_ref(state: &GraphQLState) -> Self {
        state.verifier.clone()
    }
}

/// Create the GraphQL router
pub fn graphql_router(state: GraphQLState) -> Router {
    Router::new()
        .route("/", get(graphql_playground))
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        .with_state(state)
}

/// GraphQL handler that executes operations against the schema
///
/// Requests without a valid bearer token are rejected with 401 before the
/// schema is involved. Each operation gets its own principal, loader registry
/// and cancellation token; the token fires when the deadline passes or the
/// handler returns.
async fn graphql_handler(
    State(state): State<GraphQLState>,
    AuthPrincipal(principal): AuthPrincipal,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let cancel = CancellationToken::new();
    let _cancel_on_return = cancel.clone().drop_guard();
    spawn_deadline(cancel.clone(), state.request_timeout);

    let request = prepare_request(req.into_inner(), &state.stores, principal, cancel);
    state.schema.execute(request).await.into()
}

fn spawn_deadline(cancel: CancellationToken, timeout: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "GraphQL request deadline exceeded");
                cancel.cancel();
            }
        }
    });
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
