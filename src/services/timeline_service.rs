use crate::models::{
    pagination::Page,
    tweet::{TimelineTweet, Tweet},
    user::User,
};
use crate::repositories::{FollowRepository, RepositoryError, TweetRepository, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Path the pagination links point at.
pub const TIMELINE_PATH: &str = "/api/timeline";

/// Default number of tweets per timeline page.
pub const DEFAULT_PER_PAGE: u32 = 15;

#[derive(Debug, thiserror::Error)]
pub enum TimelineServiceError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct TimelineService {
    follows: Arc<dyn FollowRepository>,
    tweets: Arc<dyn TweetRepository>,
    users: Arc<dyn UserRepository>,
    per_page: u32,
}

impl TimelineService {
    pub fn new(
        follows: Arc<dyn FollowRepository>,
        tweets: Arc<dyn TweetRepository>,
        users: Arc<dyn UserRepository>,
        per_page: u32,
    ) -> Self {
        Self {
            follows,
            tweets,
            users,
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Tweets by everyone `user` follows, newest first, one page at a time.
    pub async fn timeline(
        &self,
        user: &User,
        page: u32,
    ) -> Result<Page<TimelineTweet>, TimelineServiceError> {
        let page = page.max(1);
        let followings = self.follows.followings_of(user.id).await?;
        if followings.is_empty() {
            return Ok(Page::empty(TIMELINE_PATH, page, self.per_page));
        }

        let total = self.tweets.count_for_follower(user.id).await?;
        let tweets = self
            .tweets
            .page_for_follower(
                user.id,
                i64::from(self.per_page),
                Page::<TimelineTweet>::offset(page, self.per_page),
            )
            .await?;

        let entries = self.with_owners(tweets).await?;

        Ok(Page::new(
            entries,
            TIMELINE_PATH,
            page,
            self.per_page,
            total.max(0) as u64,
        ))
    }

    /// Load the owners of `tweets` in one query and attach them
    async fn with_owners(
        &self,
        tweets: Vec<Tweet>,
    ) -> Result<Vec<TimelineTweet>, TimelineServiceError> {
        let mut owner_ids: Vec<i64> = tweets.iter().map(|t| t.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<i64, User> = self
            .users
            .find_many(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let entries = tweets
            .into_iter()
            .filter_map(|tweet| {
                let user = owners.get(&tweet.user_id)?.clone();
                Some(TimelineTweet { tweet, user })
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::follow_repository::MockFollowRepository;
    use crate::repositories::tweet_repository::MockTweetRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn user(id: i64) -> User {
        let now = Utc::now();
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
            email_verified_at: None,
            password_hash: "hash".to_string(),
            image: "avatars/u.png".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn tweet(id: i64, user_id: i64, text: &str) -> Tweet {
        let now = Utc::now();
        Tweet {
            id,
            text: text.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_timeline_without_followings_is_empty_page() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_followings_of()
            .with(eq(1))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(Vec::new()) }));

        let mut tweets = MockTweetRepository::new();
        tweets.expect_page_for_follower().never();
        tweets.expect_count_for_follower().never();

        let service = TimelineService::new(
            Arc::new(follows),
            Arc::new(tweets),
            Arc::new(MockUserRepository::new()),
            DEFAULT_PER_PAGE,
        );

        let page = service.timeline(&user(1), 1).await.expect("timeline");
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
    }

    #[tokio::test]
    async fn test_timeline_embeds_owners() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_followings_of()
            .returning(|_| Box::pin(async move { Ok(vec![2, 3]) }));

        let mut tweets = MockTweetRepository::new();
        tweets
            .expect_count_for_follower()
            .with(eq(1))
            .returning(|_| Box::pin(async move { Ok(3) }));
        tweets
            .expect_page_for_follower()
            .with(eq(1), eq(2), eq(2))
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(vec![tweet(5, 3, "third")]) }));

        let mut users = MockUserRepository::new();
        users
            .expect_find_many()
            .withf(|ids| *ids == [3])
            .times(1)
            .returning(|_| Box::pin(async move { Ok(vec![user(3)]) }));

        let service = TimelineService::new(Arc::new(follows), Arc::new(tweets), Arc::new(users), 2);

        let page = service.timeline(&user(1), 2).await.expect("timeline");
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.last_page, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].tweet.text, "third");
        assert_eq!(page.data[0].user.id, 3);
    }
}
