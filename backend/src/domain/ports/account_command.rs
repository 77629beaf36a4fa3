//! Driving port for account lifecycle use-cases.
//!
//! Inbound adapters call this port to register, authenticate and look up
//! accounts without importing the credential or persistence adapters behind
//! it.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome, SignupRequest, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a student, or an employee under a domain-locked company.
    ///
    /// # Errors
    ///
    /// - `forbidden` when the work email domain differs from the company's
    ///   locked domain.
    /// - `conflict` when the email is registered or the domain belongs to a
    ///   different company.
    async fn signup(&self, request: SignupRequest) -> Result<User, Error>;

    /// Check credentials and issue a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Force the verified flag on an account.
    async fn verify(&self, user_id: &UserId) -> Result<User, Error>;

    /// Fetch the caller's account.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
