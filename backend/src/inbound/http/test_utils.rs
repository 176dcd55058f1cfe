//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;
use mockable::DefaultClock;

use super::state::HttpState;
use crate::domain::Mediator;
use crate::outbound::crypto::Argon2PasswordHasher;
use crate::outbound::in_memory_ports;
use crate::outbound::memory::InMemoryStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over an empty in-memory store with cheap hashing.
pub fn test_state() -> web::Data<HttpState> {
    let hasher = Argon2PasswordHasher::new(8, 1, 1).expect("test argon2 params");
    let ports = in_memory_ports(
        Arc::new(InMemoryStore::new()),
        Arc::new(hasher),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(Mediator::new(ports)))
}

/// The session cookie set by `response`.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
