use super::RepositoryResult;
use crate::models::auth_token::PersonalAccessToken;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TokenRepository: Send + Sync {
    /// Store a hashed token and return its id
    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> RepositoryResult<i64>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PersonalAccessToken>>;
    async fn touch_last_used(&self, id: i64) -> RepositoryResult<()>;
    async fn count_for_user(&self, user_id: i64) -> RepositoryResult<i64>;
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> RepositoryResult<i64> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO personal_access_tokens (user_id, name, token, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(token_hash)
        .bind(expires_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PersonalAccessToken>> {
        let token = sqlx::query_as::<_, PersonalAccessToken>(
            r#"
            SELECT id, user_id, name, token, last_used_at, expires_at, created_at, updated_at
            FROM personal_access_tokens
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn touch_last_used(&self, id: i64) -> RepositoryResult<()> {
        let now = Utc::now();
        sqlx::query("UPDATE personal_access_tokens SET last_used_at = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_for_user(&self, user_id: i64) -> RepositoryResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM personal_access_tokens WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
