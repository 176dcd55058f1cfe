//! Mapping from port errors to domain errors.
//!
//! Storage failures surface as [`ErrorCode::InternalError`] with a generic
//! message; the adapter's own text only reaches the logs. Uniqueness
//! conflicts become validation failures against the clashing field.

use tracing::error;

use super::ports::{
    ArticleRepositoryError, CommentRepositoryError, PasswordHasherError, SocialGraphError,
    UserPersistenceError,
};
use super::{Error, Violation, Violations};

fn internal(source: &dyn std::fmt::Display, message: &'static str) -> Error {
    error!(error = %source, "{}", message);
    Error::internal(message)
}

fn taken(field: String) -> Error {
    let mut violations = Violations::default();
    violations.push(Violation::new(field, "taken", "has already been taken"));
    Error::validation_failed(violations)
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Conflict { field } => taken(format!("user.{field}")),
        other => internal(&other, "user store unavailable"),
    }
}

pub(crate) fn map_social_graph_error(err: SocialGraphError) -> Error {
    match err {
        SocialGraphError::SelfFollow => Error::invalid_operation("users cannot follow themselves"),
        other => internal(&other, "social graph unavailable"),
    }
}

pub(crate) fn map_article_error(err: ArticleRepositoryError) -> Error {
    match err {
        ArticleRepositoryError::DuplicateSlug { .. } => taken("article.title".to_owned()),
        other => internal(&other, "article store unavailable"),
    }
}

pub(crate) fn map_comment_error(err: CommentRepositoryError) -> Error {
    internal(&err, "comment store unavailable")
}

pub(crate) fn map_hasher_error(err: PasswordHasherError) -> Error {
    internal(&err, "password hashing failed")
}
