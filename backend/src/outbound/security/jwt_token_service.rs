//! HS256 bearer tokens carrying `sub`, `iat` and `exp` claims.
//!
//! Expiry is checked against the injected clock rather than the system time
//! `jsonwebtoken` would use, so the 30 day lifetime is testable.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AuthToken, TokenClaims, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// `TokenService` signing with a shared HMAC secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService").finish_non_exhaustive()
    }
}

impl JwtTokenService {
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

fn timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid(format!("{claim} is out of range")))
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &TokenClaims) -> Result<AuthToken, TokenError> {
        let wire = WireClaims {
            sub: claims.subject.to_string(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(AuthToken {
            token,
            expires_at: claims.expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            },
        )?;
        let wire = data.claims;
        let expires_at = timestamp(wire.exp, "exp")?;
        if expires_at <= self.clock.utc() {
            return Err(TokenError::expired());
        }
        Ok(TokenClaims {
            subject: UserId::new(&wire.sub)
                .map_err(|err| TokenError::invalid(format!("sub: {err}")))?,
            issued_at: timestamp(wire.iat, "iat")?,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"an-hmac-secret-that-is-at-least-32-bytes";

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::fixed())
    }

    fn service(clock: &Arc<MutableClock>) -> JwtTokenService {
        JwtTokenService::new(SECRET, clock.clone())
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_claims(clock: Arc<MutableClock>) {
        let tokens = service(&clock);
        let claims = TokenClaims::issue(UserId::random(), clock.utc());

        let issued = tokens.issue(&claims).expect("issue");
        let verified = tokens.verify(&issued.token).expect("verify");

        assert_eq!(verified, claims);
        assert_eq!(issued.expires_at, claims.expires_at);
    }

    #[rstest]
    fn tokens_expire_after_thirty_days(clock: Arc<MutableClock>) {
        let tokens = service(&clock);
        let issued = tokens
            .issue(&TokenClaims::issue(UserId::random(), clock.utc()))
            .expect("issue");

        clock.advance(TimeDelta::days(29));
        assert!(tokens.verify(&issued.token).is_ok());

        clock.advance(TimeDelta::days(1));
        assert_eq!(tokens.verify(&issued.token), Err(TokenError::expired()));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid(clock: Arc<MutableClock>) {
        let forged = JwtTokenService::new(b"some-other-secret-of-sufficient-size", clock.clone())
            .issue(&TokenClaims::issue(UserId::random(), clock.utc()))
            .expect("issue");

        let err = service(&clock).verify(&forged.token).expect_err("forged");

        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_invalid(clock: Arc<MutableClock>, #[case] token: &str) {
        let err = service(&clock).verify(token).expect_err("garbage");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[rstest]
    fn non_uuid_subjects_are_invalid(clock: Arc<MutableClock>) {
        let wire = WireClaims {
            sub: "admin".to_owned(),
            iat: clock.utc().timestamp(),
            exp: (clock.utc() + TimeDelta::days(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &wire,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");

        let err = service(&clock).verify(&token).expect_err("bad subject");

        assert!(matches!(err, TokenError::Invalid { .. }));
    }
}
