//! User accounts and the values that describe them.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{CompanyId, EmailDomain, UserId};

/// Maximum length of a stored email address.
pub const EMAIL_MAX: usize = 320;
/// Maximum length of a display name or job position.
pub const NAME_MAX: usize = 120;

/// Validation errors for user-facing account values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not split into exactly one local part and one domain.
    #[error("email must contain exactly one '@' between a local part and a domain")]
    MalformedEmail,
    /// Email contained whitespace.
    #[error("email must not contain whitespace")]
    EmailWhitespace,
    /// Email exceeded the storage limit.
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded the storage limit.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// Position exceeded the storage limit.
    #[error("position must be at most {max} characters")]
    PositionTooLong { max: usize },
    /// Role string was not recognised.
    #[error("role must be one of: student, employee")]
    UnknownRole,
}

/// Lower-cased email address with exactly one `@`.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Local part and domain are both non-empty.
///
/// # Examples
/// ```
/// use referrals::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ada@Acme.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@acme.com");
/// assert_eq!(email.domain().as_ref(), "acme.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    raw: String,
    at: usize,
}

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::EmailWhitespace);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }

        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(UserValidationError::MalformedEmail);
        }

        let at = local.len();
        Ok(Self { raw: normalised, at })
    }

    /// Part before the `@`.
    pub fn local_part(&self) -> &str {
        self.raw.get(..self.at).unwrap_or_default()
    }

    /// Domain after the `@`.
    pub fn domain(&self) -> EmailDomain {
        EmailDomain::from_trusted(self.raw.get(self.at + 1..).unwrap_or_default())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.raw.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Human readable name shown to other parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate an optional job position.
pub fn parse_position(position: Option<&str>) -> Result<Option<String>, UserValidationError> {
    let Some(trimmed) = position.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::PositionTooLong { max: NAME_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Role discriminant without attached data, used for parsing and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Student,
    Employee,
}

impl RoleKind {
    /// Stable lower-case storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Employee => "employee",
        }
    }
}

impl std::str::FromStr for RoleKind {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "employee" => Ok(Self::Employee),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Employment details carried only by employees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employment {
    pub company_id: CompanyId,
    pub work_email: EmailAddress,
    pub position: Option<String>,
}

/// Account role. Only employees are associated with a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Student,
    Employee(Employment),
}

impl UserRole {
    /// Data-free discriminant of this role.
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Student => RoleKind::Student,
            Self::Employee(_) => RoleKind::Employee,
        }
    }

    /// Employment details when the user is an employee.
    pub fn employment(&self) -> Option<&Employment> {
        match self {
            Self::Student => None,
            Self::Employee(employment) => Some(employment),
        }
    }
}

/// Persisted user account without credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub role: UserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Company the user works for, if any.
    pub fn company_id(&self) -> Option<CompanyId> {
        self.role.employment().map(|employment| employment.company_id)
    }
}
