//! User loader for batched fetching
//!
//! Batches user id lookups (e.g. `Task.user` across a task list) into a
//! single `users.list` call.

use std::sync::Arc;

use super::{by_key, storage_failure, BatchLoader, LoadError};
use crate::models::User;
use crate::repositories::UserStore;

/// Point loader for users by id
pub struct UserLoader {
    store: Arc<dyn UserStore>,
}

impl UserLoader {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

impl BatchLoader for UserLoader {
    type Key = String;
    type Value = User;
    const NAME: &'static str = "user";

    async fn load(&self, keys: &[String]) -> Vec<Result<User, LoadError>> {
        match self.store.list(keys).await {
            Ok(users) => by_key(Self::NAME, keys, users, |u| &u.id),
            Err(err) => storage_failure(Self::NAME, keys.len(), err),
        }
    }
}
