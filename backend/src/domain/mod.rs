//! Domain primitives, ports, and the request dispatch pipeline.
//!
//! Purpose: hold every business rule of the service behind transport- and
//! storage-agnostic types. Inbound adapters build a typed request plus a
//! [`Caller`] and hand both to the [`Mediator`]; outbound adapters implement
//! the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: the single failure type every operation returns.
//! - User, Article, Comment, FollowEdge: entities and their value types.
//! - Mediator / Routes / Pipeline: static dispatch with auth and validation
//!   gates ahead of each handler.
//! - ProfileProjector: viewer-scoped profile views.

pub mod article;
pub mod comment;
pub mod context;
pub mod error;
pub mod follow;
pub mod identity;
pub mod mediator;
pub mod pipeline;
mod port_errors;
pub mod ports;
pub mod profile;
pub mod requests;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::article::{Article, ArticleId, ArticleValidationError, ArticleView, Slug};
pub use self::comment::{
    Comment, CommentBody, CommentId, CommentValidationError, CommentView, NewComment,
    newest_first,
};
pub use self::context::{Caller, RequestContext};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::follow::{FollowEdge, FollowOutcome, UnfollowOutcome};
pub use self::identity::{Credential, IdentityContext};
pub use self::mediator::{Mediator, Ports, Routes};
pub use self::pipeline::{Auth, Handler, Pipeline, Request};
pub use self::profile::{ProfileProjector, ProfileView};
pub use self::requests::*;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, Password, PasswordHash, USERNAME_MAX, User, UserChanges, UserId, UserValidationError,
    UserView, Username,
};
pub use self::validation::{FieldError, NoRules, RuleSet, Violation, Violations};
