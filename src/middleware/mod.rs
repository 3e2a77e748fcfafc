pub mod bearer_auth;

pub use bearer_auth::{extract_bearer_token, require_bearer_auth, AuthenticatedUser};
