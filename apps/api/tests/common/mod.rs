//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure for integration tests,
//! including in-memory stores, seeded fixtures, token signing and helpers
//! for running GraphQL operations.

#![allow(unused_imports)]

pub mod fakes;
pub mod fixtures;
pub mod helpers;

pub use fakes::*;
pub use fixtures::*;
pub use helpers::*;
