/// Result of a follow request. Following twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

impl FollowOutcome {
    pub fn message(self) -> &'static str {
        match self {
            FollowOutcome::Followed => "User followed successfully.",
            FollowOutcome::AlreadyFollowing => "You are already following this user.",
        }
    }
}
