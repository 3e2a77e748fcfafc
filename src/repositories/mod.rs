pub mod follow_repository;
pub mod token_repository;
pub mod tweet_repository;
pub mod user_repository;

pub use follow_repository::{FollowRepository, SqliteFollowRepository};
pub use token_repository::{SqliteTokenRepository, TokenRepository};
pub use tweet_repository::{SqliteTweetRepository, TweetRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
