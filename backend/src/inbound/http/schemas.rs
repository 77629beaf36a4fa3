//! Wire representations of domain aggregates.
//!
//! Domain types stay free of serde and utoipa derives; the structs here carry
//! the camelCase JSON shape and the OpenAPI schema, and convert from the
//! domain values handlers receive from the ports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Company, CompanyId, CompanySummary, Notification, NotificationId, PartySummary,
    ReferralOverview, ReferralRequest, ReferralRequestId, User, UserId,
};

/// A user account without credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@gmail.com")]
    pub email: String,
    #[schema(example = "employee")]
    pub role: String,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "ada@acme.com")]
    pub work_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let employment = user.role.employment();
        Self {
            id: user.id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role.kind().as_str().to_owned(),
            is_verified: user.is_verified,
            company_id: employment.map(|e| e.company_id),
            work_email: employment.map(|e| e.work_email.to_string()),
            position: employment.and_then(|e| e.position.clone()),
            created_at: user.created_at,
        }
    }
}

/// A registered company and its referral form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: CompanyId,
    #[schema(example = "Acme")]
    pub name: String,
    #[schema(example = "acme.com")]
    pub domain: String,
    #[schema(example = 1)]
    pub schema_version: u16,
    #[schema(example = json!({"require_resume": true, "require_job_id": true}))]
    pub form_config: Value,
    pub created_by: UserId,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name.to_string(),
            domain: company.domain.to_string(),
            schema_version: company.form_config.schema_version(),
            form_config: company.form_config.to_value(),
            created_by: company.created_by,
        }
    }
}

/// Candidate application fields attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub name: String,
    pub contact: String,
    pub resume_link: String,
    #[schema(example = "acme.com/jobs/1")]
    pub job_link: String,
    pub motivation: String,
}

/// A referral request as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub id: ReferralRequestId,
    pub student_id: UserId,
    pub employee_id: Option<UserId>,
    pub company_id: Option<CompanyId>,
    #[schema(example = "pending")]
    pub status: String,
    pub candidate: CandidateResponse,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReferralRequest> for ReferralResponse {
    fn from(request: ReferralRequest) -> Self {
        let candidate = &request.candidate;
        Self {
            id: request.id,
            student_id: request.student_id,
            employee_id: request.employee_id,
            company_id: request.company_id,
            status: request.status.as_str().to_owned(),
            candidate: CandidateResponse {
                name: candidate.name().to_owned(),
                contact: candidate.contact().to_owned(),
                resume_link: candidate.resume_link().to_owned(),
                job_link: candidate.job_link().to_owned(),
                motivation: candidate.motivation().to_owned(),
            },
            expires_at: request.expires_at,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Id and display name of a person involved in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartyResponse {
    pub id: UserId,
    pub name: String,
}

impl From<PartySummary> for PartyResponse {
    fn from(party: PartySummary) -> Self {
        Self {
            id: party.id,
            name: party.name.to_string(),
        }
    }
}

/// Id and name of the company a request is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummaryResponse {
    pub id: CompanyId,
    pub name: String,
}

impl From<CompanySummary> for CompanySummaryResponse {
    fn from(company: CompanySummary) -> Self {
        Self {
            id: company.id,
            name: company.name.to_string(),
        }
    }
}

/// A request listed with the people and company it involves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralOverviewResponse {
    #[serde(flatten)]
    pub request: ReferralResponse,
    pub student: PartyResponse,
    pub employee: Option<PartyResponse>,
    pub company: Option<CompanySummaryResponse>,
}

impl From<ReferralOverview> for ReferralOverviewResponse {
    fn from(overview: ReferralOverview) -> Self {
        Self {
            request: overview.request.into(),
            student: overview.student.into(),
            employee: overview.employee.map(Into::into),
            company: overview.company.map(Into::into),
        }
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    #[schema(example = "status_update")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            message: notification.message,
            kind: notification.kind.as_str().to_owned(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}
