//! Todos-by-Task loader for batched fetching

use std::sync::Arc;

use super::{grouped, storage_failure, BatchLoader, LoadError};
use crate::models::Todo;
use crate::repositories::TodoStore;

/// Grouped loader for the todos of each task
pub struct TodosByTaskLoader {
    store: Arc<dyn TodoStore>,
}

impl TodosByTaskLoader {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

impl BatchLoader for TodosByTaskLoader {
    type Key = String;
    type Value = Vec<Todo>;
    const NAME: &'static str = "todos_by_task";

    async fn load(&self, keys: &[String]) -> Vec<Result<Vec<Todo>, LoadError>> {
        match self.store.list_by_task_ids(keys).await {
            Ok(todos) => grouped(keys, todos, |t| &t.task_id),
            Err(err) => storage_failure(Self::NAME, keys.len(), err),
        }
    }
}
