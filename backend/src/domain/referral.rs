//! Referral requests and the rules that govern their lifecycle.
//!
//! A request starts `Pending` and is decided exactly once. A broadcast request
//! (addressed to a company) has no employee until the first employee to act on
//! it claims it; the claim is a compare-and-set performed by the repository.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use url::Url;

use super::{CompanyId, CompanyName, PersonName, ReferralRequestId, UserId};

/// Days a request stays open before it lapses.
pub const REFERRAL_TTL_DAYS: i64 = 5;
/// Maximum length of the motivation statement.
pub const MOTIVATION_MAX: usize = 2000;
/// Maximum length of the other candidate fields.
pub const CANDIDATE_FIELD_MAX: usize = 512;

/// Lifetime of a newly created referral request.
pub fn referral_ttl() -> TimeDelta {
    TimeDelta::days(REFERRAL_TTL_DAYS)
}

/// Lifecycle state of a referral request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferralStatus {
    Pending,
    Accepted,
    Rejected,
    /// Reached when a pending request outlives its deadline.
    Expired,
    /// Reserved for administrative withdrawal; nothing transitions here yet.
    AutoCancelled,
}

impl ReferralStatus {
    /// Stable snake-case storage and wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::AutoCancelled => "auto_cancelled",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown referral status '{0}'")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for ReferralStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            "autocancelled" => Ok(Self::AutoCancelled),
            _ => Err(UnknownStatus(s.to_owned())),
        }
    }
}

/// Outcome an employee may choose for a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// Terminal status a successful decision produces.
    pub fn target_status(self) -> ReferralStatus {
        match self {
            Self::Accept => ReferralStatus::Accepted,
            Self::Reject => ReferralStatus::Rejected,
        }
    }
}

impl TryFrom<ReferralStatus> for Decision {
    type Error = ReferralStatus;

    fn try_from(value: ReferralStatus) -> Result<Self, Self::Error> {
        match value {
            ReferralStatus::Accepted => Ok(Self::Accept),
            ReferralStatus::Rejected => Ok(Self::Reject),
            other => Err(other),
        }
    }
}

/// Who a new request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralTarget {
    /// A specific employee.
    Employee(UserId),
    /// Any employee at the company; the first to act claims it.
    Company(CompanyId),
}

/// Validation errors for candidate application fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferralValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be an http(s) link")]
    InvalidLink { field: &'static str },
}

impl ReferralValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } | Self::InvalidLink { field } => {
                field
            }
        }
    }
}

/// Unvalidated candidate fields as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateInput {
    pub name: String,
    pub contact: String,
    pub resume_link: String,
    pub job_link: String,
    pub motivation: Option<String>,
}

/// Validated candidate application attached to a request.
///
/// # Examples
/// ```
/// use referrals::domain::{CandidateDetails, CandidateInput};
///
/// let details = CandidateDetails::new(CandidateInput {
///     name: "Sam".into(),
///     contact: "sam@uni.edu".into(),
///     resume_link: "https://cv.example/sam".into(),
///     job_link: "acme.com/jobs/1".into(),
///     motivation: None,
/// })
/// .unwrap();
/// assert_eq!(details.job_link(), "acme.com/jobs/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetails {
    name: String,
    contact: String,
    resume_link: String,
    job_link: String,
    motivation: String,
}

impl CandidateDetails {
    /// Validate candidate fields, trimming surrounding whitespace.
    pub fn new(input: CandidateInput) -> Result<Self, ReferralValidationError> {
        let name = required("candidateName", &input.name)?;
        let contact = required("candidateContact", &input.contact)?;
        let resume_link = link("resumeLink", &input.resume_link)?;
        let job_link = link("jobLink", &input.job_link)?;
        let motivation = input.motivation.as_deref().unwrap_or_default().trim();
        if motivation.chars().count() > MOTIVATION_MAX {
            return Err(ReferralValidationError::TooLong {
                field: "motivation",
                max: MOTIVATION_MAX,
            });
        }
        Ok(Self {
            name,
            contact,
            resume_link,
            job_link,
            motivation: motivation.to_owned(),
        })
    }

    /// Rebuild details read back from storage.
    pub(crate) fn from_stored(
        name: String,
        contact: String,
        resume_link: String,
        job_link: String,
        motivation: String,
    ) -> Self {
        Self {
            name,
            contact,
            resume_link,
            job_link,
            motivation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn resume_link(&self) -> &str {
        &self.resume_link
    }

    pub fn job_link(&self) -> &str {
        &self.job_link
    }

    pub fn motivation(&self) -> &str {
        &self.motivation
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ReferralValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReferralValidationError::Empty { field });
    }
    if trimmed.chars().count() > CANDIDATE_FIELD_MAX {
        return Err(ReferralValidationError::TooLong {
            field,
            max: CANDIDATE_FIELD_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Accepts absolute http(s) URLs and bare `host/path` links.
fn link(field: &'static str, value: &str) -> Result<String, ReferralValidationError> {
    let trimmed = required(field, value)?;
    let has_scheme = trimmed.contains("://");
    let candidate = if has_scheme {
        trimmed.clone()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&candidate).map_err(|_| ReferralValidationError::InvalidLink { field })?;
    let scheme_ok = matches!(parsed.scheme(), "http" | "https");
    let host_ok = parsed
        .host_str()
        .is_some_and(|host| has_scheme || host.contains('.'));
    if scheme_ok && host_ok {
        Ok(trimmed)
    } else {
        Err(ReferralValidationError::InvalidLink { field })
    }
}

/// Why an employee may not decide a request right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRejection {
    /// Another employee already owns the request.
    ClaimedByOther,
    /// The request is unassigned and addressed to a different company.
    OutsideCompany,
    /// The request has already left `Pending`.
    AlreadyDecided(ReferralStatus),
    /// The request is pending but its deadline has passed.
    Expired,
}

/// A persisted referral request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralRequest {
    pub id: ReferralRequestId,
    pub student_id: UserId,
    pub employee_id: Option<UserId>,
    pub company_id: Option<CompanyId>,
    pub status: ReferralStatus,
    pub candidate: CandidateDetails,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferralRequest {
    /// Whether the deadline has passed at `now`.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether `employee` at `company` may decide this request.
    ///
    /// The rules are evaluated in a fixed order so a failed claim is always
    /// reported the same way regardless of which check ran first in storage.
    pub fn check_decider(
        &self,
        employee: UserId,
        company: CompanyId,
        now: DateTime<Utc>,
    ) -> Result<(), DecisionRejection> {
        match self.employee_id {
            Some(owner) if owner != employee => return Err(DecisionRejection::ClaimedByOther),
            None if self.company_id != Some(company) => {
                return Err(DecisionRejection::OutsideCompany);
            }
            _ => {}
        }
        if self.status != ReferralStatus::Pending {
            return Err(DecisionRejection::AlreadyDecided(self.status));
        }
        if self.is_past_deadline(now) {
            return Err(DecisionRejection::Expired);
        }
        Ok(())
    }

    /// Whether `employee` at `company` may see this request in their queue.
    pub fn is_visible_to_employee(&self, employee: UserId, company: CompanyId) -> bool {
        match self.employee_id {
            Some(owner) => owner == employee,
            None => self.company_id == Some(company),
        }
    }
}

/// Input for persisting a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReferralRequest {
    pub id: ReferralRequestId,
    pub student_id: UserId,
    pub employee_id: Option<UserId>,
    pub company_id: CompanyId,
    pub candidate: CandidateDetails,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewReferralRequest {
    /// Build a pending request addressed directly or to a company.
    ///
    /// `company_id` is the addressed company for broadcasts and the employee's
    /// company for direct requests.
    pub fn new(
        student_id: UserId,
        employee_id: Option<UserId>,
        company_id: CompanyId,
        candidate: CandidateDetails,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReferralRequestId::random(),
            student_id,
            employee_id,
            company_id,
            candidate,
            created_at: now,
            expires_at: now + referral_ttl(),
        }
    }
}

/// Name and id of a party shown alongside a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartySummary {
    pub id: UserId,
    pub name: PersonName,
}

/// Name and id of the company shown alongside a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: CompanyName,
}

/// A request with the people and company it involves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralOverview {
    pub request: ReferralRequest,
    pub student: PartySummary,
    pub employee: Option<PartySummary>,
    pub company: Option<CompanySummary>,
}
