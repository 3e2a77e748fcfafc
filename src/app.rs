use crate::{config::AppConfig, handlers, middleware::require_bearer_auth, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Assemble the HTTP application: the JSON API under `/api` and the public
/// file store under `/storage`.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let protected_routes = Router::new()
        .route("/user", get(handlers::current_user))
        .route("/tweets", post(handlers::store_tweet))
        .route("/timeline", get(handlers::timeline))
        .route("/users/follow", post(handlers::follow))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    let api_routes = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .merge(protected_routes);

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/storage", ServeDir::new(&config.storage_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
