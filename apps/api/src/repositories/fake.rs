//! In-memory store used by unit tests
//!
//! Records every call with the keys it received and can be switched into a
//! failing mode where each call returns a storage error.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{Stores, TaskStore, TodoStore, UserStore};
use crate::models::{Task, Todo, User};

#[derive(Default)]
pub struct FakeStore {
    users: Mutex<Vec<User>>,
    tasks: Mutex<Vec<Task>>,
    todos: Mutex<Vec<Todo>>,
    calls: Mutex<Vec<(&'static str, Vec<String>)>>,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores::new(self.clone(), self.clone(), self.clone())
    }

    pub fn insert_user(&self, user: User) {
        upsert(&self.users, user, |u| &u.id);
    }

    pub fn insert_task(&self, task: Task) {
        upsert(&self.tasks, task, |t| &t.id);
    }

    pub fn insert_todo(&self, todo: Todo) {
        upsert(&self.todos, todo, |t| &t.id);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Calls made so far as `(method, keys)`
    pub fn calls(&self) -> Vec<(&'static str, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, method: &'static str, keys: &[String]) -> Result<(), sqlx::Error> {
        self.calls.lock().unwrap().push((method, keys.to_vec()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn upsert<T: Clone>(rows: &Mutex<Vec<T>>, row: T, id: impl Fn(&T) -> &String) {
    let mut rows = rows.lock().unwrap();
    match rows.iter_mut().find(|existing| id(existing) == id(&row)) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}

fn select<T: Clone>(rows: &Mutex<Vec<T>>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.lock().unwrap().iter().filter(|row| keep(row)).cloned().collect()
}

#[async_trait]
impl UserStore for FakeStore {
    async fn store(&self, user: &User) -> Result<User, sqlx::Error> {
        self.record("users.store", &[user.id.clone()])?;
        self.insert_user(user.clone());
        Ok(user.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        self.record("users.get", &[id.to_string()])?;
        Ok(select(&self.users, |u| u.id == id).pop())
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<User>, sqlx::Error> {
        self.record("users.list", ids)?;
        Ok(select(&self.users, |u| ids.contains(&u.id)))
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn store(&self, task: &Task) -> Result<Task, sqlx::Error> {
        self.record("tasks.store", &[task.id.clone()])?;
        self.insert_task(task.clone());
        Ok(task.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Task>, sqlx::Error> {
        self.record("tasks.get", &[id.to_string()])?;
        Ok(select(&self.tasks, |t| t.id == id).pop())
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list", ids)?;
        Ok(select(&self.tasks, |t| ids.contains(&t.id)))
    }

    async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list_by_user_id", &[user_id.to_string()])?;
        Ok(select(&self.tasks, |t| t.user_id == user_id))
    }

    async fn list_by_user_ids(&self, user_ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list_by_user_ids", user_ids)?;
        Ok(select(&self.tasks, |t| user_ids.contains(&t.user_id)))
    }
}

#[async_trait]
impl TodoStore for FakeStore {
    async fn store(&self, todo: &Todo) -> Result<Todo, sqlx::Error> {
        self.record("todos.store", &[todo.id.clone()])?;
        self.insert_todo(todo.clone());
        Ok(todo.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>, sqlx::Error> {
        self.record("todos.get", &[id.to_string()])?;
        Ok(select(&self.todos, |t| t.id == id).pop())
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        self.record("todos.list", ids)?;
        Ok(select(&self.todos, |t| ids.contains(&t.id)))
    }

    async fn list_by_task_ids(&self, task_ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        self.record("todos.list_by_task_ids", task_ids)?;
        Ok(select(&self.todos, |t| task_ids.contains(&t.task_id)))
    }
}
