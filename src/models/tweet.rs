use super::user::User;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Maximum tweet length, counted in characters.
pub const MAX_TWEET_LENGTH: usize = 140;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Tweet {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTweet {
    pub user_id: i64,
    pub text: String,
}

impl NewTweet {
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id,
            text: text.into(),
        }
    }
}

/// A timeline entry: the tweet with its owner embedded under `user`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineTweet {
    #[serde(flatten)]
    pub tweet: Tweet,
    pub user: User,
}
