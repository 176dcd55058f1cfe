//! Port for comment storage.
use async_trait::async_trait;

use crate::domain::{ArticleId, Comment, CommentId, NewComment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Comment storage.
///
/// Adapters assign [`CommentId`]s from a strictly increasing sequence, so a
/// later insert always receives a larger identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist `comment` and return it with its assigned identifier.
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError>;

    /// All comments on `article`, in no particular order.
    async fn list_for_article(
        &self,
        article: &ArticleId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Fetch a comment by identifier.
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Delete a comment. Returns whether a row was removed.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError>;
}
