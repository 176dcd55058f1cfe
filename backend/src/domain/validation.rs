//! Field-level validation results and per-request rule sets.
//!
//! Rules run after the auth gate and before the handler. Every rule runs;
//! violations accumulate and are reported together in a single
//! [`crate::domain::ErrorCode::ValidationFailed`] error.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Error;
use super::article::ArticleValidationError;
use super::comment::CommentValidationError;
use super::context::RequestContext;
use super::user::UserValidationError;

/// One failed rule.
///
/// `field` is a dotted path such as `user.email`; `code` is a stable
/// machine-readable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    field: String,
    code: String,
    message: String,
}

impl Violation {
    /// Build a violation for `field`.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Dotted field path.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Machine-readable code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Domain validation errors that can be reported against a field.
pub trait FieldError: fmt::Display {
    /// Stable code for the violation.
    fn code(&self) -> &'static str;
}

impl FieldError for UserValidationError {
    fn code(&self) -> &'static str {
        UserValidationError::code(self)
    }
}

impl FieldError for CommentValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyBody => "empty",
        }
    }
}

impl FieldError for ArticleValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptySlug | Self::EmptyTitle => "empty",
            Self::InvalidSlug => "invalid_slug",
        }
    }
}

/// Free text that is empty once trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blank;

impl fmt::Display for Blank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("must not be empty")
    }
}

impl FieldError for Blank {
    fn code(&self) -> &'static str {
        "empty"
    }
}

/// Accept `value` unless it is blank.
pub fn non_blank(value: &str) -> Result<&str, Blank> {
    if value.trim().is_empty() {
        Err(Blank)
    } else {
        Ok(value)
    }
}

/// Convert a single constructor result into a domain result, reporting a
/// failure as a one-violation [`crate::domain::ErrorCode::ValidationFailed`].
///
/// Handlers use this to re-parse fields their rule set already checked.
pub fn parse_field<T, E>(field: &str, result: Result<T, E>) -> Result<T, Error>
where
    E: FieldError,
{
    let mut violations = Violations::default();
    match violations.check(field, result) {
        Some(value) => Ok(value),
        None => Err(Error::validation_failed(violations)),
    }
}

/// Ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Append a violation.
    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Record the outcome of a value constructor.
    ///
    /// Returns the value on success; on failure records a violation against
    /// `field` and returns `None`.
    ///
    /// # Examples
    /// ```
    /// use conduit::domain::{Email, Violations};
    ///
    /// let mut violations = Violations::default();
    /// assert!(violations.check("user.email", Email::new("nope")).is_none());
    /// assert_eq!(violations.len(), 1);
    /// ```
    pub fn check<T, E>(&mut self, field: &str, result: Result<T, E>) -> Option<T>
    where
        E: FieldError,
    {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(Violation::new(field, err.code(), err.to_string()));
                None
            }
        }
    }

    /// Whether no rule failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validation rules attached to one request type.
///
/// Rules may read state through ports (e.g. uniqueness checks) but must not
/// mutate it. `Err` is reserved for collaborator failures; rule failures are
/// reported as [`Violations`].
#[async_trait]
pub trait RuleSet<R>: Send + Sync
where
    R: Send + Sync,
{
    /// Check `request` and return every violated rule.
    async fn validate(&self, request: &R, ctx: &RequestContext) -> Result<Violations, Error>;
}

/// Rule set for requests without validation rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRules;

#[async_trait]
impl<R> RuleSet<R> for NoRules
where
    R: Send + Sync + 'static,
{
    async fn validate(&self, _request: &R, _ctx: &RequestContext) -> Result<Violations, Error> {
        Ok(Violations::default())
    }
}
