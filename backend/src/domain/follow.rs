//! Directed follower→followed edges of the social graph.

use super::Error;
use super::user::UserId;

/// "`follower` follows `followed`".
///
/// ## Invariants
/// - `follower != followed`; a self-edge cannot be constructed.
///
/// Edges are independent records rather than references between users, so
/// the graph never forms ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FollowEdge {
    follower: UserId,
    followed: UserId,
}

impl FollowEdge {
    /// Build an edge, rejecting self-follows with
    /// [`crate::domain::ErrorCode::InvalidOperation`].
    ///
    /// # Examples
    /// ```
    /// use conduit::domain::{ErrorCode, FollowEdge, UserId};
    ///
    /// let me = UserId::random();
    /// let err = FollowEdge::new(me, me).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::InvalidOperation);
    /// ```
    pub fn new(follower: UserId, followed: UserId) -> Result<Self, Error> {
        if follower == followed {
            return Err(Error::invalid_operation("users cannot follow themselves"));
        }
        Ok(Self { follower, followed })
    }

    /// The user doing the following.
    pub fn follower(&self) -> &UserId {
        &self.follower
    }

    /// The user being followed.
    pub fn followed(&self) -> &UserId {
        &self.followed
    }
}

/// Result of an idempotent follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// The edge did not exist and was inserted.
    Inserted,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
}

/// Result of an idempotent unfollow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    /// The edge existed and was removed.
    Removed,
    /// No edge existed; nothing changed.
    NotFollowing,
}
