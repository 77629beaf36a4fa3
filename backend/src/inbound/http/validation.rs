//! Request validation helpers shared by the HTTP handlers.
//!
//! Every failure becomes an `invalid_request` error whose `details` name the
//! offending field and a stable code, so clients can highlight inputs.

use std::str::FromStr;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

/// Stable codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    MalformedBody,
    MalformedPath,
    MalformedQuery,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedPath => "malformed_path",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Payload field name as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// `invalid_request` carrying `{field, code}` details.
pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a UUID-backed identifier, reporting the field on failure.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse::<T>()
        .map_err(|_| invalid_uuid_error(field, value))
}

fn malformed(code: ErrorCode, what: &str, err: impl std::fmt::Display) -> actix_web::Error {
    Error::invalid_request(format!("{what}: {err}"))
        .with_details(json!({ "code": code.as_str() }))
        .into()
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedBody, "malformed JSON body", err)
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedPath, "malformed path parameter", err)
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedQuery, "malformed query string", err)
}

/// Extractor configuration that turns framework parse errors into the domain
/// error envelope instead of actix's plain-text bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
