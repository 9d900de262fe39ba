//! Tasks-by-User loader for batched fetching
//!
//! Batches owner id lookups into a single `tasks.list_by_user_ids` call,
//! returning all tasks for each user. Users without tasks get an empty list.

use std::sync::Arc;

use super::{grouped, storage_failure, BatchLoader, LoadError};
use crate::models::Task;
use crate::repositories::TaskStore;

/// Grouped loader for the tasks owned by each user
pub struct TasksByUserLoader {
    store: Arc<dyn TaskStore>,
}

impl TasksByUserLoader {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

impl BatchLoader for TasksByUserLoader {
    type Key = String;
    type Value = Vec<Task>;
    const NAME: &'static str = "tasks_by_user";

    async fn load(&self, keys: &[String]) -> Vec<Result<Vec<Task>, LoadError>> {
        match self.store.list_by_user_ids(keys).await {
            Ok(tasks) => grouped(keys, tasks, |t| &t.user_id),
            Err(err) => storage_failure(Self::NAME, keys.len(), err),
        }
    }
}
