//! Caller identity as resolved for a single request.

use std::fmt;

use super::Error;
use super::user::{User, UserId};

/// Opaque authentication token presented by a caller.
///
/// The core never interprets the token; a
/// [`crate::domain::ports::CredentialResolver`] maps it to a user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Who is making the request.
///
/// Either a guest or exactly one resolved [`User`]. Created once per request
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    user: Option<User>,
}

impl IdentityContext {
    /// An unauthenticated caller.
    pub fn guest() -> Self {
        Self { user: None }
    }

    /// A caller resolved to `user`.
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Whether a user was resolved.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The resolved user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Identifier of the resolved user, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(User::id)
    }

    /// The resolved user, or [`crate::domain::ErrorCode::Unauthorized`].
    ///
    /// Handlers behind [`crate::domain::Auth::Required`] never observe the
    /// error because the pipeline rejects guests first.
    pub fn require_user(&self) -> Result<&User, Error> {
        self.user
            .as_ref()
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }
}
