use super::RepositoryResult;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait FollowRepository: Send + Sync {
    /// Insert the edge `follower_id -> user_id`.
    ///
    /// Returns `false` when the edge already existed.
    async fn follow(&self, follower_id: i64, user_id: i64) -> RepositoryResult<bool>;
    async fn is_following(&self, follower_id: i64, user_id: i64) -> RepositoryResult<bool>;
    /// Ids of the users `user_id` follows
    async fn followings_of(&self, user_id: i64) -> RepositoryResult<Vec<i64>>;
    /// Ids of the users following `user_id`
    async fn followers_of(&self, user_id: i64) -> RepositoryResult<Vec<i64>>;
}

pub struct SqliteFollowRepository {
    pool: SqlitePool,
}

impl SqliteFollowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for SqliteFollowRepository {
    async fn follow(&self, follower_id: i64, user_id: i64) -> RepositoryResult<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO follower_user (follower_id, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (follower_id, user_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, follower_id: i64, user_id: i64) -> RepositoryResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follower_user WHERE follower_id = ? AND user_id = ?)",
        )
        .bind(follower_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    async fn followings_of(&self, user_id: i64) -> RepositoryResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT user_id FROM follower_user WHERE follower_id = ? ORDER BY created_at, user_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn followers_of(&self, user_id: i64) -> RepositoryResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT follower_id FROM follower_user WHERE user_id = ? ORDER BY created_at, follower_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
