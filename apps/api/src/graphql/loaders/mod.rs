//! Batch loaders for GraphQL relationship fields
//!
//! Relationship resolvers never call the stores directly. They go through a
//! per-request [`Loaders`] registry whose dispatchers coalesce the keys of one
//! resolution wave into a single bulk query, solving the N+1 problem.
//!
//! There are two kinds of loaders:
//! - Point loaders: one record per id, or `NotFound` for that id
//! - Grouped loaders: the (possibly empty) list of children per parent id

mod dispatcher;
mod task;
mod tasks_by_user;
mod todo;
mod todos_by_task;
mod user;

pub use dispatcher::{BatchLoader, Dispatcher, LoadError};
pub use task::TaskLoader;
pub use tasks_by_user::TasksByUserLoader;
pub use todo::TodoLoader;
pub use todos_by_task::TodosByTaskLoader;
pub use user::UserLoader;

use std::collections::HashMap;
use std::hash::Hash;
use tokio_util::sync::CancellationToken;

use crate::repositories::Stores;

/// Dispatchers for every access path, scoped to one GraphQL operation
///
/// Built fresh for each request and dropped with it, so nothing loaded for
/// one caller is ever visible to another.
pub struct Loaders {
    pub user: Dispatcher<UserLoader>,
    pub task: Dispatcher<TaskLoader>,
    pub todo: Dispatcher<TodoLoader>,
    pub tasks_by_user: Dispatcher<TasksByUserLoader>,
    pub todos_by_task: Dispatcher<TodosByTaskLoader>,
}

impl Loaders {
    pub fn new(stores: &Stores, cancel: CancellationToken) -> Self {
        Self {
            user: Dispatcher::new(UserLoader::new(stores.users.clone()), cancel.clone()),
            task: Dispatcher::new(TaskLoader::new(stores.tasks.clone()), cancel.clone()),
            todo: Dispatcher::new(TodoLoader::new(stores.todos.clone()), cancel.clone()),
            tasks_by_user: Dispatcher::new(
                TasksByUserLoader::new(stores.tasks.clone()),
                cancel.clone(),
            ),
            todos_by_task: Dispatcher::new(TodosByTaskLoader::new(stores.todos.clone()), cancel),
        }
    }
}

/// Match point-lookup rows back to the requested ids
fn by_key<K, V>(
    resource: &'static str,
    keys: &[K],
    rows: Vec<V>,
    key_of: impl Fn(&V) -> &K,
) -> Vec<Result<V, LoadError>>
where
    K: Eq + Hash + ToString,
    V: Clone,
{
    let found: HashMap<&K, &V> = rows.iter().map(|row| (key_of(row), row)).collect();
    keys.iter()
        .map(|key| {
            found
                .get(key)
                .map(|row| (*row).clone())
                .ok_or_else(|| LoadError::not_found(resource, key.to_string()))
        })
        .collect()
}

/// Partition grouped-lookup rows by parent id, keeping query order
fn grouped<K, V>(keys: &[K], rows: Vec<V>, key_of: impl Fn(&V) -> &K) -> Vec<Result<Vec<V>, LoadError>>
where
    K: Eq + Hash + Clone,
{
    let mut groups: HashMap<K, Vec<V>> = HashMap::with_capacity(keys.len());
    for row in rows {
        groups.entry(key_of(&row).clone()).or_default().push(row);
    }
    keys.iter()
        .map(|key| Ok(groups.remove(key).unwrap_or_default()))
        .collect()
}

/// Every key of the wave fails with the same storage error
fn storage_failure<V>(resource: &'static str, keys: usize, err: sqlx::Error) -> Vec<Result<V, LoadError>> {
    tracing::error!(loader = resource, keys, error = %err, "Batch query failed");
    let err = LoadError::from(err);
    (0..keys).map(|_| Err(err.clone())).collect()
}
