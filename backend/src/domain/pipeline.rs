//! Ordered policy stages wrapped around every request handler.
//!
//! A [`Pipeline`] runs, in order: the authentication gate, the validation
//! gate, then the handler. Cancellation is checked before each stage. A
//! failing stage short-circuits: later stages never run and nothing is
//! mutated.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::Error;
use super::context::RequestContext;
use super::validation::RuleSet;

/// Whether a request may be sent by guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Guests are rejected with [`crate::domain::ErrorCode::Unauthorized`].
    Required,
    /// Guests and authenticated callers are both admitted.
    Optional,
}

/// A typed request understood by the [`crate::domain::Mediator`].
pub trait Request: Send + Sync + 'static {
    /// Value produced by a successful handler.
    type Response: Send + 'static;
    /// Name recorded in logs.
    const NAME: &'static str;
    /// Authentication policy.
    const AUTH: Auth;
}

/// Business logic for one request type.
///
/// Handlers may assume the caller passed the authentication gate and that the
/// request satisfied its rule set.
#[async_trait]
pub trait Handler<R>: Send + Sync
where
    R: Request,
{
    /// Execute `request` once the auth and validation stages have passed.
    async fn handle(&self, request: R, ctx: &RequestContext) -> Result<R::Response, Error>;
}

/// Rule set and handler bound to one request type.
pub struct Pipeline<R>
where
    R: Request,
{
    rules: Arc<dyn RuleSet<R>>,
    handler: Arc<dyn Handler<R>>,
}

impl<R> Clone for Pipeline<R>
where
    R: Request,
{
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R> Pipeline<R>
where
    R: Request,
{
    /// Pair a rule set with the handler it guards.
    pub fn new(rules: Arc<dyn RuleSet<R>>, handler: Arc<dyn Handler<R>>) -> Self {
        Self { rules, handler }
    }

    /// Run `request` through every stage.
    pub async fn run(&self, request: R, ctx: &RequestContext) -> Result<R::Response, Error> {
        let name = R::NAME;

        ensure_active(name, "authentication", ctx)?;
        if R::AUTH == Auth::Required && !ctx.identity().is_authenticated() {
            warn!(request = name, "rejected unauthenticated caller");
            return Err(Error::unauthorized("authentication required"));
        }
        debug!(request = name, "authentication gate passed");

        ensure_active(name, "validation", ctx)?;
        let violations = self.rules.validate(&request, ctx).await?;
        if !violations.is_empty() {
            warn!(
                request = name,
                violations = violations.len(),
                "rejected invalid request"
            );
            return Err(Error::validation_failed(violations));
        }
        debug!(request = name, "validation gate passed");

        ensure_active(name, "handler", ctx)?;
        let response = self.handler.handle(request, ctx).await;
        match &response {
            Ok(_) => debug!(request = name, "handler completed"),
            Err(err) => debug!(request = name, code = ?err.code(), "handler failed"),
        }
        response
    }
}

fn ensure_active(name: &'static str, stage: &'static str, ctx: &RequestContext) -> Result<(), Error> {
    ctx.ensure_active().inspect_err(|_| {
        warn!(request = name, stage, "request cancelled");
    })
}
