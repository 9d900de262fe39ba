//! Test helper functions for API integration tests
//!
//! Provides utilities for executing GraphQL operations directly against the
//! schema or through the HTTP router, and for reading error codes.

#![allow(dead_code)]

use async_graphql::{Request, Response};
use axum::{
    body::Body,
    http::{header, Request as HttpRequest, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use taskboard_api::graphql::{build_schema, prepare_request};
use taskboard_api::models::Principal;
use taskboard_api::routes::{graphql_router, GraphQLState};
use taskboard_api::TokenVerifier;

use super::fakes::RecordingStore;
use super::fixtures::TEST_SECRET;

/// Execute an operation as `subject` holding `scope`
pub async fn execute(store: &Arc<RecordingStore>, subject: &str, scope: &str, query: &str) -> Response {
    execute_with_cancel(store, subject, scope, query, CancellationToken::new()).await
}

/// Execute an operation with an explicit cancellation token
pub async fn execute_with_cancel(
    store: &Arc<RecordingStore>,
    subject: &str,
    scope: &str,
    query: &str,
    cancel: CancellationToken,
) -> Response {
    let stores = store.stores();
    let schema = build_schema(stores.clone());
    let request = prepare_request(
        Request::new(query),
        &stores,
        Principal::new(subject, scope),
        cancel,
    );
    schema.execute(request).await
}

/// Response data as JSON
pub fn data(response: &Response) -> Value {
    response.data.clone().into_json().unwrap()
}

/// `extensions.code` of every error, in order
pub fn error_codes(response: &Response) -> Vec<String> {
    response
        .errors
        .iter()
        .map(|e| {
            e.extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .map(|code| code.to_string().trim_matches('"').to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// GraphQL router accepting HS256 tokens signed with the test secret
pub fn test_router(store: &Arc<RecordingStore>) -> Router {
    let stores = store.stores();
    graphql_router(GraphQLState {
        schema: build_schema(stores.clone()),
        stores,
        verifier: Arc::new(TokenVerifier::shared_secret(TEST_SECRET).unwrap()),
        request_timeout: Duration::from_secs(30),
    })
}

/// POST a GraphQL query with an optional Authorization header value
pub async fn post_graphql(app: Router, authorization: Option<&str>, query: &str) -> (StatusCode, Value) {
    let mut request = HttpRequest::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    let body = serde_json::json!({ "query": query }).to_string();

    let response = app
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
