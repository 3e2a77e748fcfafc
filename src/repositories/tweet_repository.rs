use super::{RepositoryError, RepositoryResult};
use crate::models::tweet::{NewTweet, Tweet};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TweetRepository: Send + Sync {
    async fn create_tweet(&self, new_tweet: &NewTweet) -> RepositoryResult<Tweet>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tweet>>;
    async fn list_by_user(&self, user_id: i64) -> RepositoryResult<Vec<Tweet>>;
    /// Tweets by the users `follower_id` follows, newest first,
    /// `created_at` then `id` descending
    async fn page_for_follower(
        &self,
        follower_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Tweet>>;
    async fn count_for_follower(&self, follower_id: i64) -> RepositoryResult<i64>;
}

pub struct SqliteTweetRepository {
    pool: SqlitePool,
}

impl SqliteTweetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// One bound parameter however many users are followed
const FOLLOWED_AUTHORS: &str =
    "user_id IN (SELECT user_id FROM follower_user WHERE follower_id = ?)";

#[async_trait]
impl TweetRepository for SqliteTweetRepository {
    async fn create_tweet(&self, new_tweet: &NewTweet) -> RepositoryResult<Tweet> {
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO tweets (user_id, text, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new_tweet.user_id)
        .bind(&new_tweet.text)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tweet>> {
        let tweet = sqlx::query_as::<_, Tweet>(
            "SELECT id, text, user_id, created_at, updated_at FROM tweets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tweet)
    }

    async fn list_by_user(&self, user_id: i64) -> RepositoryResult<Vec<Tweet>> {
        let tweets = sqlx::query_as::<_, Tweet>(
            r#"
            SELECT id, text, user_id, created_at, updated_at
            FROM tweets
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tweets)
    }

    async fn page_for_follower(
        &self,
        follower_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Tweet>> {
        let sql = format!(
            r#"
            SELECT id, text, user_id, created_at, updated_at
            FROM tweets
            WHERE {}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            FOLLOWED_AUTHORS
        );
        let tweets = sqlx::query_as::<_, Tweet>(&sql)
            .bind(follower_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(tweets)
    }

    async fn count_for_follower(&self, follower_id: i64) -> RepositoryResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM tweets WHERE {}", FOLLOWED_AUTHORS);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(follower_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
