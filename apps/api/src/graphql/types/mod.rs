//! GraphQL type definitions for the Taskboard API
//!
//! Object types wrap the database models and resolve relationships through
//! the request's batch loaders.

mod task;
mod todo;
mod user;

pub use task::{Status, Task};
pub use todo::Todo;
pub use user::User;
