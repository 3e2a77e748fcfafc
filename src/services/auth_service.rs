use crate::models::{auth_token::PlainTextToken, user::User};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::auth_token_service::{AuthTokenError, AuthTokenService, DEFAULT_TOKEN_NAME};
use crate::validation::{self, ValidationErrors};
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Token error: {0}")]
    TokenError(AuthTokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<AuthTokenError> for AuthServiceError {
    fn from(err: AuthTokenError) -> Self {
        match err {
            AuthTokenError::InvalidToken | AuthTokenError::ExpiredToken => {
                AuthServiceError::Unauthenticated
            }
            other => AuthServiceError::TokenError(other),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<AuthTokenService>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<AuthTokenService>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Check credentials and issue a fresh token
    pub async fn login(&self, request: LoginRequest) -> Result<PlainTextToken, AuthServiceError> {
        let mut errors = ValidationErrors::new();
        let email = validation::required_str(&mut errors, "email", request.email.as_deref())
            .map(str::trim);
        if let Some(email) = email {
            validation::email(&mut errors, "email", email);
        }
        let password =
            validation::required_str(&mut errors, "password", request.password.as_deref());

        let (email, password) = match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => (email, password),
            _ => return Err(AuthServiceError::Validation(errors)),
        };

        let user = self.verify_credentials(email, password).await?;
        let token = self
            .token_service
            .issue_token(user.id, DEFAULT_TOKEN_NAME)
            .await?;

        tracing::info!("User {} logged in", user.id);
        Ok(token)
    }

    /// Resolve a bearer token to the user that owns it
    pub async fn authenticate(&self, bearer: &str) -> Result<User, AuthServiceError> {
        let token = self.token_service.validate_token(bearer).await?;

        self.user_repository
            .find_by_id(token.user_id)
            .await?
            .ok_or(AuthServiceError::Unauthenticated)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthServiceError> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login rejected: unknown email");
                return Err(AuthServiceError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!("Login rejected: wrong password for user {}", user.id);
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}
