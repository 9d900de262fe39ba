//! Middleware components for the Taskboard API
//!
//! This module provides the authentication extractor for Axum handlers:
//! - `AuthPrincipal`: Requires a valid bearer token, returns 401 if
//!   missing or invalid

pub mod auth;

pub use auth::{extract_bearer_token, AuthPrincipal};
