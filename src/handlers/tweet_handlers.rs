use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::StoreTweetRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub page: Option<String>,
}

impl TimelineQuery {
    /// Requested page, falling back to the first page for anything that is
    /// not a positive integer.
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

/// `POST /api/tweets`
pub async fn store_tweet(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<StoreTweetRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload?;
    let tweet = state.tweet_service.create_tweet(&user, request).await?;

    Ok(Json(json!({ "tweet": tweet })))
}

/// `GET /api/timeline?page=N`
pub async fn timeline(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Value>> {
    let page = state.timeline_service.timeline(&user, query.page()).await?;

    Ok(Json(json!({ "tweets": page })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>) -> TimelineQuery {
        TimelineQuery {
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_timeline_page_parsing() {
        assert_eq!(query(None).page(), 1);
        assert_eq!(query(Some("3")).page(), 3);
        assert_eq!(query(Some("0")).page(), 1);
        assert_eq!(query(Some("-2")).page(), 1);
        assert_eq!(query(Some("abc")).page(), 1);
    }
}
