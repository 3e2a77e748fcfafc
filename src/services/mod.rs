pub mod auth_service;
pub mod auth_token_service;
pub mod avatar_store;
pub mod follow_service;
pub mod timeline_service;
pub mod tweet_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use auth_token_service::{AuthTokenError, AuthTokenService};
pub use avatar_store::{AvatarStore, LocalAvatarStore, StorageError};
pub use follow_service::{FollowRequest, FollowService, FollowServiceError};
pub use timeline_service::{TimelineService, TimelineServiceError};
pub use tweet_service::{StoreTweetRequest, TweetService, TweetServiceError};
pub use user_service::{AvatarUpload, SignupRequest, UserService, UserServiceError};
