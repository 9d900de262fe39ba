//! Task repository

use async_trait::async_trait;
use sqlx::PgPool;

use super::utils::TASK_COLUMNS;
use crate::models::Task;

/// Storage port for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert or update a task, returning the stored row
    async fn store(&self, task: &Task) -> Result<Task, sqlx::Error>;

    /// Find a task by id
    async fn get(&self, id: &str) -> Result<Option<Task>, sqlx::Error>;

    /// Find all tasks whose id is in `ids`, in no particular order
    async fn list(&self, ids: &[String]) -> Result<Vec<Task>, sqlx::Error>;

    /// Tasks owned by one user, oldest first
    async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<Task>, sqlx::Error>;

    /// Tasks owned by any of `user_ids`, oldest first
    async fn list_by_user_ids(&self, user_ids: &[String]) -> Result<Vec<Task>, sqlx::Error>;
}

/// PostgreSQL adapter for [`TaskStore`]
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new TaskRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn store(&self, task: &Task) -> Result<Task, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO tasks (id, text, status, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                text = EXCLUDED.text,
                status = EXCLUDED.status,
                user_id = EXCLUDED.user_id,
                updated_at = EXCLUDED.updated_at
            RETURNING {}"#,
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&task.id)
            .bind(&task.text)
            .bind(task.status)
            .bind(&task.user_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM tasks WHERE id = ANY($1)", TASK_COLUMNS);
        sqlx::query_as::<_, Task>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_by_user_id(&self, user_id: &str) -> Result<Vec<Task>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_by_user_ids(&self, user_ids: &[String]) -> Result<Vec<Task>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = ANY($1) ORDER BY user_id, created_at ASC, id ASC",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
    }
}
