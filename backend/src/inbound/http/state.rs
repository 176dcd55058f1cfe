//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain mediator and remain testable without I/O.

use std::sync::Arc;

use crate::domain::Mediator;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Request dispatcher shared by every handler.
    pub mediator: Arc<Mediator>,
}

impl HttpState {
    /// Wrap a mediator for sharing across Actix workers.
    pub fn new(mediator: Mediator) -> Self {
        Self {
            mediator: Arc::new(mediator),
        }
    }
}
