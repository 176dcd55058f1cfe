//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, User, UserChanges, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        ///
        /// `field` names the column (`username` or `email`).
        Conflict { field: String } => "user {field} already in use",
    }
}

/// Storage for registered users.
///
/// Username and email are unique. Adapters check uniqueness in the same
/// atomic step as the write and report clashes as
/// [`UserPersistenceError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised e-mail address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Merge `changes` into the stored record and return the result.
    ///
    /// The read and write happen as one atomic step, so concurrent partial
    /// updates never drop each other's fields. Uniqueness checks ignore the
    /// user's own row.
    async fn apply_changes(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError>;
}
