//! Port for the follower→followed edge relation.
use async_trait::async_trait;

use crate::domain::{FollowEdge, FollowOutcome, UnfollowOutcome, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by social graph adapters.
    pub enum SocialGraphError {
        /// Store connection could not be established.
        Connection { message: String } => "social graph connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "social graph query failed: {message}",
        /// An adapter was asked to relate a user to themselves.
        SelfFollow => "users cannot follow themselves",
    }
}

/// Follow edges between users.
///
/// ## Invariants
/// - At most one edge per ordered `(follower, followed)` pair.
/// - No self-edges.
///
/// Both mutations are idempotent: repeating them reports the no-op outcome
/// rather than failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Insert `edge` unless it already exists.
    async fn follow(&self, edge: &FollowEdge) -> Result<FollowOutcome, SocialGraphError>;

    /// Remove the edge from `follower` to `followed` if present.
    async fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<UnfollowOutcome, SocialGraphError>;

    /// Whether `follower` currently follows `followed`.
    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, SocialGraphError>;
}
