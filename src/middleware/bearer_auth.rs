use crate::{error::AppError, models::user::User, AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// The caller resolved from the bearer token, stored in request extensions
/// by [`require_bearer_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Reject requests without a valid personal access token
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("Missing bearer token for {}", request.uri().path());
        AppError::Unauthenticated
    })?;

    let user = state.auth_service.authenticate(token).await.map_err(|e| {
        tracing::warn!("Bearer token rejected: {}", e);
        AppError::from(e)
    })?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
