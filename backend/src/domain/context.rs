//! Per-request inputs supplied by the transport and the context handed to
//! rules and handlers.

use tokio_util::sync::CancellationToken;

use super::Error;
use super::identity::{Credential, IdentityContext};

/// What the transport knows about the caller before dispatch.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    credential: Option<Credential>,
    cancellation: CancellationToken,
}

impl Caller {
    /// A caller presenting no credential.
    pub fn guest() -> Self {
        Self::default()
    }

    /// A caller presenting `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token, e.g. with one tied to the connection.
    #[must_use]
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// The presented credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Token observed by every pipeline stage.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

/// Resolved identity plus the cancellation signal for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    identity: IdentityContext,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Pair a resolved identity with the request's cancellation token.
    pub fn new(identity: IdentityContext, cancellation: CancellationToken) -> Self {
        Self {
            identity,
            cancellation,
        }
    }

    /// A guest context that is never cancelled. Mostly useful in tests.
    pub fn guest() -> Self {
        Self::new(IdentityContext::guest(), CancellationToken::new())
    }

    /// Identity resolved for this request.
    pub fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    /// Whether the caller has abandoned the request.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fail with [`crate::domain::ErrorCode::Cancelled`] once cancellation
    /// has been requested. Handlers call this immediately before mutating.
    pub fn ensure_active(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::cancelled("request cancelled"));
        }
        Ok(())
    }
}
