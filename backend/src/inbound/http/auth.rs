//! Auth gate extractor for bearer-token protected handlers.
//!
//! Handlers that take an [`Authenticated`] argument only run once the
//! `Authorization: Bearer <token>` header has been verified and resolved to
//! a persisted user through the [`PrincipalResolver`] port.
//!
//! [`PrincipalResolver`]: crate::domain::ports::PrincipalResolver

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{EmployeePrincipal, Error, Principal, StudentPrincipal};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The verified caller of a protected endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

impl Authenticated {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Student capability or `403 Forbidden`.
    pub fn student(&self) -> Result<&StudentPrincipal, Error> {
        self.0.require_student()
    }

    /// Employee capability or `403 Forbidden`.
    pub fn employee(&self) -> Result<&EmployeePrincipal, Error> {
        self.0.require_employee()
    }
}

/// Extract the raw token from an `Authorization` header value.
pub(crate) fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_owned()),
        _ => Err(Error::unauthorized("authorization header must be 'Bearer <token>'")),
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let principal = state.principals.resolve(&token?).await?;
            Ok(Self(principal))
        })
    }
}
