//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, the ports those adapters implement or call, and the services
//! holding the referral workflow rules. Nothing here depends on actix-web or
//! Diesel.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `Company`, `ReferralRequest`, `Notification`: aggregates.
//! - `Principal`: the caller's capability as decided by the auth gate.
//! - `AccountService`, `CompanyService`, `ReferralService`,
//!   `NotificationService`: driving port implementations.

pub mod auth;
pub mod company;
pub mod error;
pub mod identifiers;
pub mod notification;
pub mod ports;
pub mod referral;
pub mod trace_id;
pub mod user;

mod account_service;
mod company_service;
mod notification_service;
mod referral_service;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, EmployeePrincipal, EmployeeSignup, LoginCredentials, LoginOutcome,
    LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, Principal, SignupInput, SignupRequest,
    SignupRole, SignupValidationError, StudentPrincipal, TOKEN_TTL_DAYS, TokenClaims, token_ttl,
};
pub use self::company::{
    COMPANY_NAME_MAX, Company, CompanyName, CompanyValidationError, DOMAIN_MAX, EmailDomain,
    FORM_CONFIG_MAX_BYTES, FORM_SCHEMA_VERSION, FormConfig, NewCompany,
};
pub use self::company_service::CompanyService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifiers::{CompanyId, IdValidationError, NotificationId, ReferralRequestId, UserId};
pub use self::notification::{Notification, NotificationKind};
pub use self::notification_service::NotificationService;
pub use self::referral::{
    CANDIDATE_FIELD_MAX, CandidateDetails, CandidateInput, CompanySummary, Decision,
    DecisionRejection, MOTIVATION_MAX, NewReferralRequest, PartySummary, REFERRAL_TTL_DAYS,
    ReferralOverview, ReferralRequest, ReferralStatus, ReferralTarget, ReferralValidationError,
    UnknownStatus, referral_ttl,
};
pub use self::referral_service::ReferralService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, Employment, NAME_MAX, PersonName, RoleKind, User, UserRole,
    UserValidationError, parse_position,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use referrals::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
