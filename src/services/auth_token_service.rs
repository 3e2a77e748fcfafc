use crate::models::auth_token::{generate_secret, hash_secret, PersonalAccessToken, PlainTextToken};
use crate::repositories::{RepositoryError, TokenRepository};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Name recorded on tokens issued by signup and login.
pub const DEFAULT_TOKEN_NAME: &str = "auth-token";

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("Invalid access token")]
    InvalidToken,
    #[error("Access token has expired")]
    ExpiredToken,
    #[error("Token lifetime is out of range")]
    LifetimeOutOfRange,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct AuthTokenService {
    tokens: Arc<dyn TokenRepository>,
    ttl: Option<Duration>,
}

impl AuthTokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>, ttl: Option<Duration>) -> Self {
        Self { tokens, ttl }
    }

    /// Create a new token for the user. Existing tokens stay valid.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<PlainTextToken, AuthTokenError> {
        let secret = generate_secret();
        let expires_at = match self.ttl {
            Some(ttl) => Some(
                Utc::now()
                    .checked_add_signed(ttl)
                    .ok_or(AuthTokenError::LifetimeOutOfRange)?,
            ),
            None => None,
        };

        let token_id = self
            .tokens
            .create_token(user_id, name, &hash_secret(&secret), expires_at)
            .await?;

        Ok(PlainTextToken::new(token_id, secret))
    }

    /// Resolve a presented bearer value to its stored token.
    pub async fn validate_token(&self, raw: &str) -> Result<PersonalAccessToken, AuthTokenError> {
        let presented = PlainTextToken::parse(raw.trim()).ok_or(AuthTokenError::InvalidToken)?;

        let record = self
            .tokens
            .find_by_id(presented.token_id)
            .await?
            .ok_or(AuthTokenError::InvalidToken)?;

        if !record.matches_secret(&presented.secret) {
            return Err(AuthTokenError::InvalidToken);
        }

        if record.is_expired() {
            return Err(AuthTokenError::ExpiredToken);
        }

        if let Err(e) = self.tokens.touch_last_used(record.id).await {
            tracing::warn!("Failed to record token use for token {}: {}", record.id, e);
        }

        Ok(record)
    }
}
