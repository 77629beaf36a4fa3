//! Bearer-token signing secret configuration.
//!
//! The HS256 secret is read from the environment so it can be validated
//! consistently and tested with `mockable::MockEnv`.

use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

pub(crate) const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const JWT_SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
/// Shortest secret accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral secret and warn.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// ```rust
    /// use referrals::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC key material, wiped from memory on drop.
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Random secret for development runs; tokens die with the process.
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0_u8; SECRET_MIN_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum AuthConfigError {
    /// Neither `JWT_SECRET_FILE` nor `JWT_SECRET` is set.
    #[error("missing required environment variable: JWT_SECRET_FILE or JWT_SECRET")]
    MissingSecret,
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("signing secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        origin: &'static str,
        length: usize,
        min_len: usize,
    },
}

/// Load the signing secret from `JWT_SECRET_FILE`, then `JWT_SECRET`.
///
/// ```rust
/// use mockable::MockEnv;
/// use referrals::inbound::http::auth_config::{signing_secret_from_env, BuildMode};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("x".repeat(32)),
///     _ => None,
/// });
///
/// let secret = signing_secret_from_env(&env, BuildMode::Release).expect("secret");
/// assert_eq!(secret.as_bytes().len(), 32);
/// ```
pub fn signing_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningSecret, AuthConfigError> {
    let (origin, bytes) = if let Some(path) = env.string(JWT_SECRET_FILE_ENV) {
        let path = PathBuf::from(path);
        match std::fs::read(&path) {
            Ok(mut bytes) => {
                while bytes.last().is_some_and(u8::is_ascii_whitespace) {
                    bytes.pop();
                }
                (JWT_SECRET_FILE_ENV, Zeroizing::new(bytes))
            }
            Err(error) if mode.is_debug() => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using ephemeral signing secret (dev only)"
                );
                return Ok(SigningSecret::ephemeral());
            }
            Err(source) => return Err(AuthConfigError::SecretRead { path, source }),
        }
    } else if let Some(inline) = env.string(JWT_SECRET_ENV) {
        (JWT_SECRET_ENV, Zeroizing::new(inline.into_bytes()))
    } else if mode.is_debug() {
        warn!("JWT_SECRET not set; using ephemeral signing secret (dev only)");
        return Ok(SigningSecret::ephemeral());
    } else {
        return Err(AuthConfigError::MissingSecret);
    };

    let length = bytes.len();
    if length < SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(AuthConfigError::SecretTooShort {
                origin,
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
        if length == 0 {
            warn!(origin, "empty signing secret; using ephemeral secret (dev only)");
            return Ok(SigningSecret::ephemeral());
        }
        warn!(
            origin,
            length,
            min_len = SECRET_MIN_LEN,
            "signing secret shorter than recommended"
        );
    }
    Ok(SigningSecret(bytes))
}

#[cfg(test)]
mod tests;
