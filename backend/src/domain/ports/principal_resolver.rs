//! Driving port used by the auth gate to turn a bearer token into a caller.

use async_trait::async_trait;

use crate::domain::{Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Verify `token` and load the user it names.
    ///
    /// Every failure, including a subject that no longer exists, is reported
    /// as `unauthorized`.
    async fn resolve(&self, token: &str) -> Result<Principal, Error>;
}
