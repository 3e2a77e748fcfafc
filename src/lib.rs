pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use repositories::{
    follow_repository::SqliteFollowRepository, token_repository::SqliteTokenRepository,
    tweet_repository::SqliteTweetRepository, user_repository::SqliteUserRepository,
};
use services::{
    auth_service::AuthService, auth_token_service::AuthTokenService,
    avatar_store::LocalAvatarStore, follow_service::FollowService,
    timeline_service::TimelineService, tweet_service::TweetService, user_service::UserService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub tweet_service: Arc<TweetService>,
    pub follow_service: Arc<FollowService>,
    pub timeline_service: Arc<TimelineService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wire the SQLite repositories and the local avatar store into the services
    pub fn new(pool: sqlx::SqlitePool, config: &config::AppConfig) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));
        let tweet_repository = Arc::new(SqliteTweetRepository::new(pool.clone()));
        let follow_repository = Arc::new(SqliteFollowRepository::new(pool.clone()));
        let avatar_store = Arc::new(LocalAvatarStore::new(config.storage_dir.clone()));

        let auth_token_service = Arc::new(AuthTokenService::new(
            token_repository,
            config.token_ttl,
        ));

        Self {
            user_service: Arc::new(UserService::new(
                user_repository.clone(),
                avatar_store,
                auth_token_service.clone(),
            )),
            auth_service: Arc::new(AuthService::new(
                user_repository.clone(),
                auth_token_service,
            )),
            tweet_service: Arc::new(TweetService::new(tweet_repository.clone())),
            follow_service: Arc::new(FollowService::new(
                follow_repository.clone(),
                user_repository.clone(),
            )),
            timeline_service: Arc::new(TimelineService::new(
                follow_repository,
                tweet_repository,
                user_repository,
                config.timeline_per_page,
            )),
            pool,
        }
    }
}
