//! Task loader for batched fetching
//!
//! Batches task id lookups (e.g. `Todo.task` across a todo list) into a
//! single `tasks.list` call.

use std::sync::Arc;

use super::{by_key, storage_failure, BatchLoader, LoadError};
use crate::models::Task;
use crate::repositories::TaskStore;

/// Point loader for tasks by id
pub struct TaskLoader {
    store: Arc<dyn TaskStore>,
}

impl TaskLoader {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

impl BatchLoader for TaskLoader {
    type Key = String;
    type Value = Task;
    const NAME: &'static str = "task";

    async fn load(&self, keys: &[String]) -> Vec<Result<Task, LoadError>> {
        match self.store.list(keys).await {
            Ok(tasks) => by_key(Self::NAME, keys, tasks, |t| &t.id),
            Err(err) => storage_failure(Self::NAME, keys.len(), err),
        }
    }
}
