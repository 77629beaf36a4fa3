//! Account handlers: signup, login, verification and profile.
//!
//! ```text
//! POST /signup {"name":"Ada","email":"ada@gmail.com","password":"hunter22","role":"student"}
//! POST /login {"email":"ada@gmail.com","password":"hunter22"}
//! GET /verify/{id}
//! GET /profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, SignupInput, SignupRequest,
    SignupValidationError, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::UserResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ErrorCode, FieldName, field_error, parse_id};

/// Signup body for `POST /signup`.
///
/// Employees must also send `companyName` and `workEmail`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@gmail.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "employee")]
    pub role: String,
    #[schema(example = "Acme")]
    pub company_name: Option<String>,
    #[schema(example = "ada@acme.com")]
    pub work_email: Option<String>,
    pub position: Option<String>,
}

impl From<SignupBody> for SignupInput {
    fn from(body: SignupBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: Zeroizing::new(body.password),
            role: body.role,
            company_name: body.company_name,
            work_email: body.work_email,
            position: body.position,
        }
    }
}

fn map_signup_validation_error(err: SignupValidationError) -> Error {
    let code = match &err {
        SignupValidationError::MissingEmployeeField { .. } => ErrorCode::MissingField,
        _ => ErrorCode::InvalidValue,
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

/// Register a student or employee account.
///
/// Employee signups lock the company's email domain on first use; later
/// employees must present a work email on that domain.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Work email domain does not match the company", body = Error),
        (status = 409, description = "Email or domain already registered", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(SignupInput::from(payload.into_inner()))
        .map_err(map_signup_validation_error)?;
    let user = state.accounts.signup(request).await?;
    info!(user_id = %user.id, role = user.role.kind().as_str(), "account created");
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[schema(example = "ada@gmail.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginBody> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(body: LoginBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&body.email, &body.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Bearer token issued by `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Exchange credentials for a bearer token valid for 30 days.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.accounts.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: outcome.token.token,
        expires_at: outcome.token.expires_at,
        user: outcome.user.into(),
    }))
}

/// Mark an account verified.
///
/// Stands in for an emailed verification link, so it takes no token.
#[utoipa::path(
    get,
    path = "/verify/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Account verified", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "verifyAccount",
    security([])
)]
#[get("/verify/{id}")]
pub async fn verify(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let user = state.accounts.verify(&id).await?;
    Ok(web::Json(user.into()))
}

/// Return the caller's account.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Caller's account", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "profile",
    security(("BearerToken" = []))
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.profile(&caller.principal().id()).await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
