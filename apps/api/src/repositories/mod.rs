//! Database repository layer for Taskboard
//!
//! Each entity has a storage port (an async trait) and a PostgreSQL adapter
//! implementing it. Resolvers and batch loaders only depend on the ports, so
//! tests can substitute in-memory stores.

pub mod task;
pub mod todo;
pub mod user;
pub mod utils;

#[cfg(test)]
pub(crate) mod fake;

pub use task::{TaskRepository, TaskStore};
pub use todo::{TodoRepository, TodoStore};
pub use user::{UserRepository, UserStore};

use sqlx::PgPool;
use std::sync::Arc;

/// Bundle of storage ports shared by the schema and per-request loaders
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl Stores {
    /// Assemble a bundle from individual ports
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            users,
            tasks,
            todos,
        }
    }

    /// PostgreSQL-backed stores sharing one connection pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(TaskRepository::new(pool.clone())),
            Arc::new(TodoRepository::new(pool)),
        )
    }
}
