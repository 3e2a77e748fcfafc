pub mod follow_handlers;
pub mod tweet_handlers;
pub mod user_handlers;

pub use follow_handlers::follow;
pub use tweet_handlers::{store_tweet, timeline, TimelineQuery};
pub use user_handlers::{current_user, login, signup};
