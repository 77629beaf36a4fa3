//! Companies, their locked email domains, and shared referral form settings.

use std::fmt;

use serde_json::{Map, Value, json};

use super::{CompanyId, UserId};

/// Maximum length of a company name.
pub const COMPANY_NAME_MAX: usize = 200;
/// Maximum length of a DNS domain.
pub const DOMAIN_MAX: usize = 253;
/// Maximum serialised size of a form configuration.
pub const FORM_CONFIG_MAX_BYTES: usize = 16 * 1024;
/// The only form configuration schema version currently understood.
pub const FORM_SCHEMA_VERSION: u16 = 1;

/// Validation errors for company values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompanyValidationError {
    #[error("company name must not be empty")]
    EmptyName,
    #[error("company name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("domain must not be empty")]
    EmptyDomain,
    #[error("domain must not contain '@' or whitespace")]
    InvalidDomain,
    #[error("domain must be at most {max} characters")]
    DomainTooLong { max: usize },
    #[error("form configuration must be a JSON object")]
    FormNotObject,
    #[error("form configuration must be at most {max} bytes")]
    FormTooLarge { max: usize },
    #[error("unsupported form schema version {version}")]
    UnsupportedFormVersion { version: u16 },
}

/// Company display name, matched exactly once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyName(String);

impl CompanyName {
    /// Validate a company name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CompanyValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CompanyValidationError::EmptyName);
        }
        if trimmed.chars().count() > COMPANY_NAME_MAX {
            return Err(CompanyValidationError::NameTooLong {
                max: COMPANY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CompanyName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-cased work email domain locked to a company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailDomain(String);

impl EmailDomain {
    /// Validate a domain string.
    pub fn new(domain: impl AsRef<str>) -> Result<Self, CompanyValidationError> {
        let normalised = domain.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CompanyValidationError::EmptyDomain);
        }
        if normalised.contains('@') || normalised.chars().any(char::is_whitespace) {
            return Err(CompanyValidationError::InvalidDomain);
        }
        if normalised.chars().count() > DOMAIN_MAX {
            return Err(CompanyValidationError::DomainTooLong { max: DOMAIN_MAX });
        }
        Ok(Self(normalised))
    }

    /// Wrap a domain already split from a validated [`super::EmailAddress`].
    pub(crate) fn from_trusted(domain: &str) -> Self {
        Self(domain.to_owned())
    }
}

impl AsRef<str> for EmailDomain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Versioned, opaque form configuration shared by a company's employees.
///
/// ## Invariants
/// - `body` is a JSON object of at most [`FORM_CONFIG_MAX_BYTES`] once
///   serialised.
/// - `schema_version` equals [`FORM_SCHEMA_VERSION`].
///
/// # Examples
/// ```
/// use referrals::domain::FormConfig;
/// use serde_json::json;
///
/// let config = FormConfig::new(1, json!({ "require_resume": false })).unwrap();
/// assert_eq!(config.schema_version(), 1);
/// assert!(FormConfig::new(1, json!([1, 2])).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    schema_version: u16,
    body: Map<String, Value>,
}

impl FormConfig {
    /// Validate a form configuration payload.
    pub fn new(schema_version: u16, body: Value) -> Result<Self, CompanyValidationError> {
        if schema_version != FORM_SCHEMA_VERSION {
            return Err(CompanyValidationError::UnsupportedFormVersion {
                version: schema_version,
            });
        }
        let Value::Object(body) = body else {
            return Err(CompanyValidationError::FormNotObject);
        };
        let size = serde_json::to_vec(&body).map_or(usize::MAX, |bytes| bytes.len());
        if size > FORM_CONFIG_MAX_BYTES {
            return Err(CompanyValidationError::FormTooLarge {
                max: FORM_CONFIG_MAX_BYTES,
            });
        }
        Ok(Self {
            schema_version,
            body,
        })
    }

    /// Configuration assigned to newly registered companies.
    pub fn initial() -> Self {
        let mut body = Map::new();
        body.insert("require_resume".to_owned(), json!(true));
        body.insert("require_job_id".to_owned(), json!(true));
        Self {
            schema_version: FORM_SCHEMA_VERSION,
            body,
        }
    }

    pub fn schema_version(&self) -> u16 {
        self.schema_version
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Owned JSON value of the body.
    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

/// A registered company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub name: CompanyName,
    pub domain: EmailDomain,
    pub form_config: FormConfig,
    pub created_by: UserId,
}

/// Input for registering a company with its domain locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub id: CompanyId,
    pub name: CompanyName,
    pub domain: EmailDomain,
    pub form_config: FormConfig,
    pub created_by: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CompanyValidationError::EmptyName)]
    #[case("   ", CompanyValidationError::EmptyName)]
    fn company_name_rejects_blank(#[case] raw: &str, #[case] expected: CompanyValidationError) {
        assert_eq!(CompanyName::new(raw), Err(expected));
    }

    #[rstest]
    fn company_name_preserves_case_and_trims() {
        let name = CompanyName::new("  Acme Corp ").expect("valid name");
        assert_eq!(name.as_ref(), "Acme Corp");
    }

    #[rstest]
    #[case("acme.com", Ok("acme.com"))]
    #[case(" ACME.com ", Ok("acme.com"))]
    #[case("", Err(CompanyValidationError::EmptyDomain))]
    #[case("ac me.com", Err(CompanyValidationError::InvalidDomain))]
    #[case("a@acme.com", Err(CompanyValidationError::InvalidDomain))]
    fn domain_validation(
        #[case] raw: &str,
        #[case] expected: Result<&str, CompanyValidationError>,
    ) {
        let parsed = EmailDomain::new(raw).map(|domain| domain.to_string());
        assert_eq!(parsed, expected.map(str::to_owned));
    }

    #[rstest]
    fn initial_form_requires_resume_and_job_id() {
        let config = FormConfig::initial();
        assert_eq!(config.to_value(), json!({ "require_resume": true, "require_job_id": true }));
        assert_eq!(config.schema_version(), FORM_SCHEMA_VERSION);
    }

    #[rstest]
    #[case(json!("text"))]
    #[case(json!([1, 2, 3]))]
    #[case(json!(null))]
    fn form_config_requires_object(#[case] body: Value) {
        assert_eq!(
            FormConfig::new(FORM_SCHEMA_VERSION, body),
            Err(CompanyValidationError::FormNotObject)
        );
    }

    #[rstest]
    fn form_config_rejects_unknown_versions() {
        assert_eq!(
            FormConfig::new(2, json!({})),
            Err(CompanyValidationError::UnsupportedFormVersion { version: 2 })
        );
    }

    #[rstest]
    fn form_config_rejects_oversized_payloads() {
        let body = json!({ "notes": "x".repeat(FORM_CONFIG_MAX_BYTES) });
        assert_eq!(
            FormConfig::new(FORM_SCHEMA_VERSION, body),
            Err(CompanyValidationError::FormTooLarge {
                max: FORM_CONFIG_MAX_BYTES
            })
        );
    }
}
