use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::{AvatarUpload, LoginRequest, SignupRequest};
use crate::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, State,
    },
    Extension, Json,
};
use serde_json::{json, Value};

/// `POST /api/signup` with a multipart body carrying `name`, `email`,
/// `password` and the `image` file. A body that is not multipart is treated
/// as empty so the client gets the usual field errors.
pub async fn signup(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let request = match multipart {
        Ok(multipart) => read_signup_form(multipart).await?,
        Err(rejection) => {
            tracing::debug!("Signup body is not multipart: {}", rejection);
            SignupRequest::default()
        }
    };

    let outcome = state.user_service.signup(request).await?;

    Ok(Json(json!({
        "user": outcome.user,
        "auth_token": outcome.auth_token.to_string(),
    })))
}

async fn read_signup_form(mut multipart: Multipart) -> Result<SignupRequest> {
    let mut request = SignupRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "name" => request.name = Some(field.text().await?),
            "email" => request.email = Some(field.text().await?),
            "password" => request.password = Some(field.text().await?),
            "image" => {
                let bytes = field.bytes().await?;
                request.image = Some(AvatarUpload::new(bytes.to_vec()));
            }
            other => tracing::debug!("Ignoring unexpected signup field {}", other),
        }
    }

    Ok(request)
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload?;
    let token = state.auth_service.login(request).await?;

    Ok(Json(json!({ "auth_token": token.to_string() })))
}

/// `GET /api/user`
pub async fn current_user(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<Value> {
    Json(json!({ "user": user }))
}
