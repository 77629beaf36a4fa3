//! Authentication primitives: credentials, signup input, tokens and the
//! capability-tagged principal produced by the auth gate.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use chrono::{DateTime, TimeDelta, Utc};
use zeroize::Zeroizing;

use super::{
    CompanyId, CompanyName, CompanyValidationError, EmailAddress, Error, PersonName, RoleKind,
    User, UserId, UserRole, UserValidationError, parse_position,
};

/// Days an issued bearer token remains valid.
pub const TOKEN_TTL_DAYS: i64 = 30;
/// Minimum accepted password length at signup.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length at signup.
pub const PASSWORD_MAX: usize = 128;

/// Lifetime of an issued bearer token.
pub fn token_ttl() -> TimeDelta {
    TimeDelta::days(TOKEN_TTL_DAYS)
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    #[error("{0}")]
    Email(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress`].
/// - `password` is non-empty and retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use referrals::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Uni.edu", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@uni.edu");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(LoginValidationError::Email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures on signup input, tagged by field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    #[error("name: {0}")]
    Name(UserValidationError),
    #[error("email: {0}")]
    Email(UserValidationError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
    #[error("{0}")]
    Role(UserValidationError),
    #[error("{field} is required for employees")]
    MissingEmployeeField { field: &'static str },
    #[error("companyName: {0}")]
    CompanyName(CompanyValidationError),
    #[error("workEmail: {0}")]
    WorkEmail(UserValidationError),
    #[error("position: {0}")]
    Position(UserValidationError),
}

impl SignupValidationError {
    /// Payload field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => "password",
            Self::Role(_) => "role",
            Self::MissingEmployeeField { field } => field,
            Self::CompanyName(_) => "companyName",
            Self::WorkEmail(_) => "workEmail",
            Self::Position(_) => "position",
        }
    }
}

/// Raw signup fields as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub role: String,
    pub company_name: Option<String>,
    pub work_email: Option<String>,
    pub position: Option<String>,
}

/// Employee-only signup details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSignup {
    pub company_name: CompanyName,
    pub work_email: EmailAddress,
    pub position: Option<String>,
}

/// Role requested at signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupRole {
    Student,
    Employee(EmployeeSignup),
}

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: PersonName,
    pub email: EmailAddress,
    pub password: Zeroizing<String>,
    pub role: SignupRole,
}

impl TryFrom<SignupInput> for SignupRequest {
    type Error = SignupValidationError;

    fn try_from(input: SignupInput) -> Result<Self, Self::Error> {
        let name = PersonName::new(&input.name).map_err(SignupValidationError::Name)?;
        let email = EmailAddress::new(&input.email).map_err(SignupValidationError::Email)?;
        let length = input.password.chars().count();
        if length < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(SignupValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        let kind: RoleKind = input.role.parse().map_err(SignupValidationError::Role)?;

        let role = match kind {
            RoleKind::Student => SignupRole::Student,
            RoleKind::Employee => {
                let company_name = non_blank(input.company_name.as_deref()).ok_or(
                    SignupValidationError::MissingEmployeeField {
                        field: "companyName",
                    },
                )?;
                let work_email = non_blank(input.work_email.as_deref()).ok_or(
                    SignupValidationError::MissingEmployeeField { field: "workEmail" },
                )?;
                SignupRole::Employee(EmployeeSignup {
                    company_name: CompanyName::new(company_name)
                        .map_err(SignupValidationError::CompanyName)?,
                    work_email: EmailAddress::new(work_email)
                        .map_err(SignupValidationError::WorkEmail)?,
                    position: parse_position(input.position.as_deref())
                        .map_err(SignupValidationError::Position)?,
                })
            }
        };

        Ok(Self {
            name,
            email,
            password: input.password,
            role,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Claims carried by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Claims for a token issued to `subject` at `now`.
    pub fn issue(subject: UserId, now: DateTime<Utc>) -> Self {
        Self {
            subject,
            issued_at: now,
            expires_at: now + token_ttl(),
        }
    }
}

/// A signed bearer token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: AuthToken,
    pub user: User,
}

/// Authenticated student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPrincipal {
    pub id: UserId,
    pub name: PersonName,
}

/// Authenticated employee and the company they act for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeePrincipal {
    pub id: UserId,
    pub name: PersonName,
    pub company_id: CompanyId,
}

/// Authenticated caller with its capability decided once at the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Student(StudentPrincipal),
    Employee(EmployeePrincipal),
}

impl Principal {
    /// Derive the capability from a persisted user.
    pub fn from_user(user: &User) -> Self {
        match &user.role {
            UserRole::Student => Self::Student(StudentPrincipal {
                id: user.id,
                name: user.name.clone(),
            }),
            UserRole::Employee(employment) => Self::Employee(EmployeePrincipal {
                id: user.id,
                name: user.name.clone(),
                company_id: employment.company_id,
            }),
        }
    }

    pub fn id(&self) -> UserId {
        match self {
            Self::Student(student) => student.id,
            Self::Employee(employee) => employee.id,
        }
    }

    /// Return the student capability or `403 Forbidden`.
    pub fn require_student(&self) -> Result<&StudentPrincipal, Error> {
        match self {
            Self::Student(student) => Ok(student),
            Self::Employee(_) => Err(Error::forbidden("only students can perform this action")),
        }
    }

    /// Return the employee capability or `403 Forbidden`.
    pub fn require_employee(&self) -> Result<&EmployeePrincipal, Error> {
        match self {
            Self::Employee(employee) => Ok(employee),
            Self::Student(_) => Err(Error::forbidden("only employees can perform this action")),
        }
    }
}
