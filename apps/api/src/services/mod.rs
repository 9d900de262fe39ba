//! Services for the Taskboard API
//!
//! - Access token verification against the external issuer
//! - Health checks for the database

pub mod auth;
pub mod health;

pub use auth::{KeySource, TokenVerifier, VerifierConfig};
pub use health::HealthService;
