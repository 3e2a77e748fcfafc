pub mod auth_token;
pub mod follow;
pub mod pagination;
pub mod tweet;
pub mod user;

pub use auth_token::{PersonalAccessToken, PlainTextToken};
pub use follow::FollowOutcome;
pub use pagination::Page;
pub use tweet::{NewTweet, TimelineTweet, Tweet, MAX_TWEET_LENGTH};
pub use user::{NewUser, User};
