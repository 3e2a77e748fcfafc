use crate::models::{follow::FollowOutcome, user::User};
use crate::repositories::{FollowRepository, RepositoryError, UserRepository};
use crate::validation::{self, ValidationErrors};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum FollowServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Body of `POST /api/users/follow`
#[derive(Debug, Default, Deserialize)]
pub struct FollowRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl FollowRequest {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id: Some(Value::from(user_id)),
        }
    }
}

pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    pub async fn follow(
        &self,
        follower: &User,
        request: FollowRequest,
    ) -> Result<FollowOutcome, FollowServiceError> {
        let mut errors = ValidationErrors::new();
        let target_id =
            validation::required_json_integer(&mut errors, "user_id", request.user_id.as_ref());

        let target_id = match target_id {
            Some(id) if errors.is_empty() => id,
            _ => return Err(FollowServiceError::Validation(errors)),
        };

        if !self.users.exists(target_id).await? {
            return Err(FollowServiceError::Validation(ValidationErrors::single(
                "user_id",
                "The selected user id is invalid.",
            )));
        }

        if target_id == follower.id {
            return Err(FollowServiceError::Validation(ValidationErrors::single(
                "user_id",
                "You cannot follow yourself.",
            )));
        }

        if self.follows.is_following(follower.id, target_id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        // A concurrent follow may have inserted the edge since the check
        let outcome = if self.follows.follow(follower.id, target_id).await? {
            tracing::info!("User {} followed user {}", follower.id, target_id);
            FollowOutcome::Followed
        } else {
            FollowOutcome::AlreadyFollowing
        };

        Ok(outcome)
    }

    pub async fn followings_of(&self, user: &User) -> Result<Vec<i64>, FollowServiceError> {
        Ok(self.follows.followings_of(user.id).await?)
    }

    pub async fn followers_of(&self, user: &User) -> Result<Vec<i64>, FollowServiceError> {
        Ok(self.follows.followers_of(user.id).await?)
    }
}
