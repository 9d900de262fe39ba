//! Authentication extractor for Axum handlers
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::middleware::AuthPrincipal;
//!
//! async fn protected_handler(AuthPrincipal(principal): AuthPrincipal) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.subject())
//! }
//! ```
//!
//! The handler's state must provide an `Arc<TokenVerifier>` through
//! `FromRef`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Principal;
use crate::services::TokenVerifier;

/// Authenticated caller extractor - requires a valid bearer token
///
/// Rejects the request with a JSON [`ApiError`] response:
/// - 401 `UNAUTHORIZED` if no `Authorization` header is present
/// - 401 `INVALID_TOKEN` if the header is malformed or the token fails
///   verification
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let verifier = Arc::<TokenVerifier>::from_ref(state);

        let principal = verifier.verify(token).await?;
        tracing::debug!(subject = principal.subject(), "Request authenticated");

        Ok(Self(principal))
    }
}

/// Extract the bearer token from the Authorization header
///
/// The scheme is matched case-insensitively. Values with a different scheme,
/// a missing token or trailing parts are rejected as malformed.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers.get(AUTHORIZATION).ok_or(ApiError::Unauthorized)?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::InvalidToken("malformed authorization header".to_string()))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ApiError::InvalidToken(
            "malformed authorization header".to_string(),
        )),
    }
}
