//! In-memory storage ports for integration tests
//!
//! `RecordingStore` implements every store trait over plain vectors, records
//! each call with the keys it received and can be told to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use taskboard_api::models::{Task, Todo, User};
use taskboard_api::repositories::{TaskStore, TodoStore, UserStore};
use taskboard_api::Stores;

/// A recorded storage call: method name and the keys passed to it
pub type Call = (&'static str, Vec<String>);

#[derive(Default)]
pub struct RecordingStore {
    users: Mutex<Vec<User>>,
    tasks: Mutex<Vec<Task>>,
    todos: Mutex<Vec<Todo>>,
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bundle this store behind all three ports
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores::new(self.clone(), self.clone(), self.clone())
    }

    pub fn add_user(&self, user: User) {
        upsert(&self.users, user, |u| &u.id);
    }

    pub fn add_task(&self, task: Task) {
        upsert(&self.tasks, task, |t| &t.id);
    }

    pub fn add_todo(&self, todo: Todo) {
        upsert(&self.todos, todo, |t| &t.id);
    }

    pub fn user(&self, id: &str) -> Option<User> {
        rows(&self.users, |u| u.id == id).pop()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        rows(&self.tasks, |t| t.id == id).pop()
    }

    pub fn todo(&self, id: &str) -> Option<Todo> {
        rows(&self.todos, |t| t.id == id).pop()
    }

    /// Make every subsequent call fail with a storage error
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls to one method, in order
    pub fn calls_to(&self, method: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, keys)| keys)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, method: &'static str, keys: &[String]) -> Result<(), sqlx::Error> {
        self.calls.lock().unwrap().push((method, keys.to_vec()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn upsert<T>(rows: &Mutex<Vec<T>>, row: T, id: impl Fn(&T) -> &String) {
    let mut rows = rows.lock().unwrap();
    match rows.iter_mut().find(|existing| id(existing) == id(&row)) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}

fn rows<T: Clone>(rows: &Mutex<Vec<T>>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.lock().unwrap().iter().filter(|row| keep(row)).cloned().collect()
}

#[async_trait]
impl UserStore for RecordingStore {
    async fn store(&self, user: &User) -> Result<User, sqlx::Error> {
        self.record("users.store", &[user.id.clone()])?;
        // Upserts keep the first creation time
        let stored = match self.user(&user.id) {
            Some(existing) => User {
                created_at: existing.created_at,
                ..user.clone()
            },
            None => user.clone(),
        };
        self.add_user(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        self.record("users.get", &[id.to_string()])?;
        Ok(self.user(id))
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<User>, sqlx::Error> {
        self.record("users.list", ids)?;
        Ok(rows(&self.users, |u| ids.contains(&u.id)))
    }
}

#[async_trait]
impl TaskStore for RecordingStore {
    async fn store(&self, task: &Task) -> Result<Task, sqlx::Error> {
        self.record("tasks.store", &[task.id.clone()])?;
        self.add_task(task.clone());
        Ok(task.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Task>, sqlx::Error> {
        self.record("tasks.get", &[id.to_string()])?;
        Ok(self.task(id))
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list", ids)?;
        Ok(rows(&self.tasks, |t| ids.contains(&t.id)))
    }

    async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list_by_user_id", &[user_id.to_string()])?;
        Ok(rows(&self.tasks, |t| t.user_id == user_id))
    }

    async fn list_by_user_ids(&self, user_ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        self.record("tasks.list_by_user_ids", user_ids)?;
        Ok(rows(&self.tasks, |t| user_ids.contains(&t.user_id)))
    }
}

#[async_trait]
impl TodoStore for RecordingStore {
    async fn store(&self, todo: &Todo) -> Result<Todo, sqlx::Error> {
        self.record("todos.store", &[todo.id.clone()])?;
        self.add_todo(todo.clone());
        Ok(todo.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>, sqlx::Error> {
        self.record("todos.get", &[id.to_string()])?;
        Ok(self.todo(id))
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        self.record("todos.list", ids)?;
        Ok(rows(&self.todos, |t| ids.contains(&t.id)))
    }

    async fn list_by_task_ids(&self, task_ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        self.record("todos.list_by_task_ids", task_ids)?;
        Ok(rows(&self.todos, |t| task_ids.contains(&t.task_id)))
    }
}
