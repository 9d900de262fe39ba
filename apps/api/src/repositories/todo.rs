//! Todo repository

use async_trait::async_trait;
use sqlx::PgPool;

use super::utils::TODO_COLUMNS;
use crate::models::Todo;

/// Storage port for todos
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert or update a todo, returning the stored row
    async fn store(&self, todo: &Todo) -> Result<Todo, sqlx::Error>;

    /// Find a todo by id
    async fn get(&self, id: &str) -> Result<Option<Todo>, sqlx::Error>;

    /// Find all todos whose id is in `ids`, in no particular order
    async fn list(&self, ids: &[String]) -> Result<Vec<Todo>, sqlx::Error>;

    /// Todos belonging to any of `task_ids`, oldest first
    async fn list_by_task_ids(&self, task_ids: &[String]) -> Result<Vec<Todo>, sqlx::Error>;
}

/// PostgreSQL adapter for [`TodoStore`]
#[derive(Clone)]
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    /// Create a new TodoRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for TodoRepository {
    async fn store(&self, todo: &Todo) -> Result<Todo, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO todos (id, text, done, task_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                text = EXCLUDED.text,
                done = EXCLUDED.done,
                task_id = EXCLUDED.task_id,
                updated_at = EXCLUDED.updated_at
            RETURNING {}"#,
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(&todo.id)
            .bind(&todo.text)
            .bind(todo.done)
            .bind(&todo.task_id)
            .bind(todo.created_at)
            .bind(todo.updated_at)
            .fetch_one(&self.pool)
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>, sqlx::Error> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM todos WHERE id = ANY($1)", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_by_task_ids(&self, task_ids: &[String]) -> Result<Vec<Todo>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM todos WHERE task_id = ANY($1) ORDER BY task_id, created_at ASC, id ASC",
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(task_ids)
            .fetch_all(&self.pool)
            .await
    }
}
