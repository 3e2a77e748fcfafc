use crate::repositories::RepositoryError;
use crate::services::{
    AuthServiceError, FollowServiceError, TimelineServiceError, TweetServiceError,
    UserServiceError,
};
use crate::validation::ValidationErrors;
use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

const INVALID_CREDENTIALS_MESSAGE: &str = "The provided credentials are incorrect.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => validation_response(&errors),
            AppError::InvalidCredentials => validation_response(&ValidationErrors::single(
                "email",
                INVALID_CREDENTIALS_MESSAGE,
            )),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthenticated." })),
            )
                .into_response(),
            AppError::Multipart(err) => {
                let status = err.status();
                (status, Json(json!({ "message": err.body_text() }))).into_response()
            }
            AppError::Json(rejection) => {
                let status = rejection.status();
                (status, Json(json!({ "message": rejection.body_text() }))).into_response()
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                server_error()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                server_error()
            }
        }
    }
}

fn validation_response(errors: &ValidationErrors) -> Response {
    let body = json!({
        "message": errors.summary(),
        "errors": errors,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Server Error" })),
    )
        .into_response()
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(errors) => AppError::Validation(errors),
            UserServiceError::RepositoryError(e) => e.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Validation(errors) => AppError::Validation(errors),
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::Unauthenticated => AppError::Unauthenticated,
            AuthServiceError::RepositoryError(e) => e.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<TweetServiceError> for AppError {
    fn from(err: TweetServiceError) -> Self {
        match err {
            TweetServiceError::Validation(errors) => AppError::Validation(errors),
            TweetServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<FollowServiceError> for AppError {
    fn from(err: FollowServiceError) -> Self {
        match err {
            FollowServiceError::Validation(errors) => AppError::Validation(errors),
            FollowServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<TimelineServiceError> for AppError {
    fn from(err: TimelineServiceError) -> Self {
        match err {
            TimelineServiceError::RepositoryError(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let mut errors = ValidationErrors::new();
        errors.add("text", "The text field is required.");
        errors.add("user_id", "The user id must be an integer.");

        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "The text field is required. (and 1 more error)"
        );
        assert_eq!(body["errors"]["text"][0], "The text field is required.");
        assert_eq!(body["errors"]["user_id"][0], "The user id must be an integer.");
    }

    #[tokio::test]
    async fn test_invalid_credentials_reported_on_email() {
        let response = AppError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["errors"]["email"][0], INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_401() {
        let response = AppError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Unauthenticated.");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = AppError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "message": "Server Error" }));
    }
}
