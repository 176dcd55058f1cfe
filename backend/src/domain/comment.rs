//! Comments attached to articles and their listing order.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProfileView;
use super::article::ArticleId;
use super::user::UserId;

/// Store-assigned comment identifier.
///
/// Identifiers increase monotonically in insertion order, which makes them a
/// stable tie-breaker when two comments share a creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(u64);

impl CommentId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for comment content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyBody,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "comment body must not be empty"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Non-empty comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate comment text. The text is kept verbatim.
    pub fn new(body: impl Into<String>) -> Result<Self, CommentValidationError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Comment contents before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article: ArticleId,
    pub author: UserId,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
}

/// Persisted comment. Immutable apart from deletion by its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub article: ArticleId,
    pub author: UserId,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Materialise a [`NewComment`] under the identifier chosen by the store.
    pub fn from_new(id: CommentId, new: NewComment) -> Self {
        Self {
            id,
            article: new.article,
            author: new.author,
            body: new.body,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }
}

/// Listing comparator: newest `created_at` first, then highest id first.
pub fn newest_first(a: &Comment, b: &Comment) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Sort comments into listing order in place.
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(newest_first);
}

/// Comment rendered for a specific viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: ProfileView,
}

impl CommentView {
    /// Combine a comment with its already-projected author.
    pub fn new(comment: &Comment, author: ProfileView) -> Self {
        Self {
            id: comment.id,
            body: comment.body.as_ref().to_owned(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author,
        }
    }
}
