//! Credential resolution for session-backed callers.
//!
//! A session credential is the caller's user id in string form. Anything
//! that does not name a stored user is treated as a guest.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{CredentialResolver, UserRepository};
use crate::domain::{Credential, Error, IdentityContext, UserId};

/// Resolves session user ids against the user repository.
#[derive(Clone)]
pub struct SessionCredentialResolver {
    users: Arc<dyn UserRepository>,
}

impl SessionCredentialResolver {
    /// Resolve ids against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialResolver for SessionCredentialResolver {
    async fn resolve<'a>(
        &self,
        credential: Option<&'a Credential>,
    ) -> Result<IdentityContext, Error> {
        let Some(credential) = credential else {
            return Ok(IdentityContext::guest());
        };
        let Ok(id) = UserId::new(credential.as_str()) else {
            debug!("malformed session credential; treating caller as guest");
            return Ok(IdentityContext::guest());
        };
        match self.users.find_by_id(&id).await {
            Ok(Some(user)) => Ok(IdentityContext::authenticated(user)),
            Ok(None) => {
                debug!(user = %id, "session names unknown user; treating caller as guest");
                Ok(IdentityContext::guest())
            }
            Err(err) => {
                error!(error = %err, "credential lookup failed");
                Err(Error::internal("identity resolution failed"))
            }
        }
    }
}
