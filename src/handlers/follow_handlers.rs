use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::FollowRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::{json, Value};

/// `POST /api/users/follow`
pub async fn follow(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<FollowRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload?;
    let outcome = state.follow_service.follow(&user, request).await?;

    Ok(Json(json!({ "message": outcome.message() })))
}
