//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local store for users, follows, articles, and
//!   comments.
//! - **crypto**: Argon2id password hashing.
//! - **session**: resolves session credentials to users.
//!
//! Adapters are thin translators between domain types and their backing
//! representation. They contain no business logic.

pub mod crypto;
pub mod memory;
pub mod session;

use std::sync::Arc;

use mockable::Clock;

use crate::domain::Ports;
use crate::domain::ports::PasswordHasher;

use self::memory::InMemoryStore;
use self::session::SessionCredentialResolver;

/// Wire every store-backed port to one [`InMemoryStore`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use conduit::domain::Mediator;
/// use conduit::outbound::crypto::Argon2PasswordHasher;
/// use conduit::outbound::in_memory_ports;
/// use conduit::outbound::memory::InMemoryStore;
/// use mockable::DefaultClock;
///
/// let ports = in_memory_ports(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(Argon2PasswordHasher::default()),
///     Arc::new(DefaultClock),
/// );
/// let _mediator = Mediator::new(ports);
/// ```
pub fn in_memory_ports(
    store: Arc<InMemoryStore>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
) -> Ports {
    Ports {
        users: store.clone(),
        graph: store.clone(),
        articles: store.clone(),
        comments: store.clone(),
        hasher,
        credentials: Arc::new(SessionCredentialResolver::new(store)),
        clock,
    }
}
