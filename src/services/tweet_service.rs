use crate::models::{
    tweet::{NewTweet, Tweet, MAX_TWEET_LENGTH},
    user::User,
};
use crate::repositories::{RepositoryError, TweetRepository};
use crate::validation::{self, ValidationErrors};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TweetServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Body of `POST /api/tweets`. `text` stays untyped so a non-string value
/// is reported as a field error rather than a decoding failure.
#[derive(Debug, Default, Deserialize)]
pub struct StoreTweetRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

impl StoreTweetRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(Value::String(text.into())),
        }
    }
}

pub struct TweetService {
    repository: Arc<dyn TweetRepository>,
}

impl TweetService {
    pub fn new(repository: Arc<dyn TweetRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_tweet(
        &self,
        owner: &User,
        request: StoreTweetRequest,
    ) -> Result<Tweet, TweetServiceError> {
        let mut errors = ValidationErrors::new();
        let text = validation::required_json_str(&mut errors, "text", request.text.as_ref())
            .map(str::trim)
            .filter(|text| validation::max_chars(&mut errors, "text", text, MAX_TWEET_LENGTH));

        let text = match text {
            Some(text) if errors.is_empty() => text,
            _ => return Err(TweetServiceError::Validation(errors)),
        };

        let tweet = self
            .repository
            .create_tweet(&NewTweet::new(owner.id, text))
            .await?;

        tracing::info!("User {} posted tweet {}", owner.id, tweet.id);
        Ok(tweet)
    }

    /// The owner's own tweets, newest first
    pub async fn tweets_of(&self, owner: &User) -> Result<Vec<Tweet>, TweetServiceError> {
        Ok(self.repository.list_by_user(owner.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::tweet_repository::MockTweetRepository;
    use chrono::Utc;
    use serde_json::json;

    fn owner() -> User {
        let now = Utc::now();
        User {
            id: 42,
            name: "Doe".to_string(),
            email: "doe@example.com".to_string(),
            email_verified_at: None,
            password_hash: "hash".to_string(),
            image: "avatars/doe.png".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn echo_repository() -> MockTweetRepository {
        let mut mock_repo = MockTweetRepository::new();
        mock_repo.expect_create_tweet().returning(|new_tweet| {
            let now = Utc::now();
            let tweet = Tweet {
                id: 1,
                text: new_tweet.text.clone(),
                user_id: new_tweet.user_id,
                created_at: now,
                updated_at: now,
            };
            Box::pin(async move { Ok(tweet) })
        });
        mock_repo
    }

    #[tokio::test]
    async fn test_create_tweet_sets_owner() {
        let service = TweetService::new(Arc::new(echo_repository()));

        let tweet = service
            .create_tweet(&owner(), StoreTweetRequest::new("hello"))
            .await
            .expect("tweet created");
        assert_eq!(tweet.text, "hello");
        assert_eq!(tweet.user_id, 42);
    }

    #[tokio::test]
    async fn test_create_tweet_accepts_exactly_max_length() {
        let service = TweetService::new(Arc::new(echo_repository()));

        let text = "a".repeat(MAX_TWEET_LENGTH);
        let tweet = service
            .create_tweet(&owner(), StoreTweetRequest::new(text.clone()))
            .await
            .expect("140 characters is allowed");
        assert_eq!(tweet.text, text);
    }

    #[tokio::test]
    async fn test_create_tweet_trims_before_length_check() {
        let service = TweetService::new(Arc::new(echo_repository()));

        let padded = format!("  {}\n", "a".repeat(MAX_TWEET_LENGTH));
        let tweet = service
            .create_tweet(&owner(), StoreTweetRequest::new(padded))
            .await
            .expect("surrounding whitespace does not count");
        assert_eq!(tweet.text, "a".repeat(MAX_TWEET_LENGTH));
    }

    #[tokio::test]
    async fn test_create_tweet_rejects_over_max_length() {
        let service = TweetService::new(Arc::new(MockTweetRepository::new()));

        let result = service
            .create_tweet(&owner(), StoreTweetRequest::new("a".repeat(MAX_TWEET_LENGTH + 1)))
            .await;
        match result {
            Err(TweetServiceError::Validation(errors)) => {
                assert_eq!(
                    errors.messages("text"),
                    ["The text must not be greater than 140 characters."]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_tweet_requires_string_text() {
        let service = TweetService::new(Arc::new(MockTweetRepository::new()));

        let missing = service
            .create_tweet(&owner(), StoreTweetRequest::default())
            .await;
        assert!(matches!(missing, Err(TweetServiceError::Validation(ref e)) if e.has("text")));

        let numeric = service
            .create_tweet(&owner(), StoreTweetRequest { text: Some(json!(12)) })
            .await;
        match numeric {
            Err(TweetServiceError::Validation(errors)) => {
                assert_eq!(errors.messages("text"), ["The text must be a string."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
