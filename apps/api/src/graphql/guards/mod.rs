//! GraphQL guards for the Taskboard API
//!
//! Guards run before a resolver body, so a rejected field never reaches a
//! loader or a store.

mod scope;

pub use scope::ScopeGuard;
