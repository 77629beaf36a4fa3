//! Port for issuing and verifying bearer tokens.

use crate::domain::{AuthToken, TokenClaims};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token is well formed but past its expiry.
        Expired => "token has expired",
        /// The token failed signature or format checks.
        Invalid { message: String } => "token is invalid: {message}",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign `claims` into a bearer token.
    fn issue(&self, claims: &TokenClaims) -> Result<AuthToken, TokenError>;

    /// Verify signature and expiry, returning the claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
