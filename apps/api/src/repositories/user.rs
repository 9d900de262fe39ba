//! User repository
//!
//! Users are upserted on `createUser` because the identifier comes from the
//! token issuer: calling it twice renames the existing user.

use async_trait::async_trait;
use sqlx::PgPool;

use super::utils::USER_COLUMNS;
use crate::models::User;

/// Storage port for users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or update a user, returning the stored row
    async fn store(&self, user: &User) -> Result<User, sqlx::Error>;

    /// Find a user by id
    async fn get(&self, id: &str) -> Result<Option<User>, sqlx::Error>;

    /// Find all users whose id is in `ids`, in no particular order
    async fn list(&self, ids: &[String]) -> Result<Vec<User>, sqlx::Error>;
}

/// PostgreSQL adapter for [`UserStore`]
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn store(&self, user: &User) -> Result<User, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO users (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, updated_at = EXCLUDED.updated_at
            RETURNING {}"#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.id)
            .bind(&user.name)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list(&self, ids: &[String]) -> Result<Vec<User>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }
}
