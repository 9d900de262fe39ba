//! Todo loader for batched fetching

use std::sync::Arc;

use super::{by_key, storage_failure, BatchLoader, LoadError};
use crate::models::Todo;
use crate::repositories::TodoStore;

/// Point loader for todos by id
pub struct TodoLoader {
    store: Arc<dyn TodoStore>,
}

impl TodoLoader {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

impl BatchLoader for TodoLoader {
    type Key = String;
    type Value = Todo;
    const NAME: &'static str = "todo";

    async fn load(&self, keys: &[String]) -> Vec<Result<Todo, LoadError>> {
        match self.store.list(keys).await {
            Ok(todos) => by_key(Self::NAME, keys, todos, |t| &t.id),
            Err(err) => storage_failure(Self::NAME, keys.len(), err),
        }
    }
}
