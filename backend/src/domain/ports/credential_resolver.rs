//! Driving port that turns an opaque credential into a caller identity.
use async_trait::async_trait;

use crate::domain::{Credential, Error, IdentityContext};

/// Resolves a caller's credential.
///
/// A missing, malformed, expired, or unknown credential resolves to
/// [`IdentityContext::guest`]. Only a failure of the backing store is an
/// error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Identify the caller holding `credential`, if any.
    async fn resolve<'a>(
        &self,
        credential: Option<&'a Credential>,
    ) -> Result<IdentityContext, Error>;
}
