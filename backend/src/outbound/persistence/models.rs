//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate stored values and report a readable message on failure.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    CandidateDetails, Company, CompanyId, CompanyName, EmailAddress, EmailDomain, Employment,
    FormConfig, NewCompany, NewReferralRequest, Notification, NotificationId, NotificationKind,
    PersonName, ReferralRequest, ReferralRequestId, ReferralStatus, RoleKind, User, UserId,
    UserRole,
};

use super::schema::{companies, notifications, referral_requests, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub company_id: Option<Uuid>,
    pub work_email: Option<String>,
    pub position: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub company_id: Option<Uuid>,
    pub work_email: Option<&'a str>,
    pub position: Option<&'a str>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub fn from_domain(user: &'a User, password_hash: &'a str) -> Self {
        let employment = user.role.employment();
        Self {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash,
            role: user.role.kind().as_str(),
            company_id: employment.map(|e| *e.company_id.as_uuid()),
            work_email: employment.map(|e| e.work_email.as_ref()),
            position: employment.and_then(|e| e.position.as_deref()),
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.created_at,
        }
    }
}

impl UserRow {
    /// Split into the domain user and the stored password hash.
    pub fn into_domain(self) -> Result<(User, String), String> {
        let name = PersonName::new(&self.name).map_err(|err| format!("stored user name: {err}"))?;
        let email =
            EmailAddress::new(&self.email).map_err(|err| format!("stored user email: {err}"))?;
        let kind: RoleKind = self
            .role
            .parse()
            .map_err(|err| format!("stored user role: {err}"))?;
        let role = match (kind, self.company_id, self.work_email) {
            (RoleKind::Student, _, _) => UserRole::Student,
            (RoleKind::Employee, Some(company_id), Some(work_email)) => {
                UserRole::Employee(Employment {
                    company_id: CompanyId::from_uuid(company_id),
                    work_email: EmailAddress::new(&work_email)
                        .map_err(|err| format!("stored work email: {err}"))?,
                    position: self.position,
                })
            }
            (RoleKind::Employee, _, _) => {
                return Err(format!("employee {} has no employment record", self.id));
            }
        };
        let user = User {
            id: UserId::from_uuid(self.id),
            name,
            email,
            role,
            is_verified: self.is_verified,
            created_at: self.created_at,
        };
        Ok((user, self.password_hash))
    }
}

/// Name-only projection used to decorate referral listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserNameRow {
    pub id: Uuid,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub form_config: Value,
    pub form_schema_version: i32,
    pub created_by: Uuid,
}

/// Name-only projection used to decorate referral listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyNameRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub(crate) struct NewCompanyRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub domain: &'a str,
    pub form_config: Value,
    pub form_schema_version: i32,
    pub created_by: Uuid,
}

impl<'a> NewCompanyRow<'a> {
    pub fn from_domain(company: &'a NewCompany) -> Self {
        Self {
            id: *company.id.as_uuid(),
            name: company.name.as_ref(),
            domain: company.domain.as_ref(),
            form_config: company.form_config.to_value(),
            form_schema_version: i32::from(company.form_config.schema_version()),
            created_by: *company.created_by.as_uuid(),
        }
    }
}

impl CompanyRow {
    pub fn into_domain(self) -> Result<Company, String> {
        let version = u16::try_from(self.form_schema_version)
            .map_err(|_| format!("stored form schema version {}", self.form_schema_version))?;
        Ok(Company {
            id: CompanyId::from_uuid(self.id),
            name: CompanyName::new(&self.name)
                .map_err(|err| format!("stored company name: {err}"))?,
            domain: EmailDomain::new(&self.domain)
                .map_err(|err| format!("stored company domain: {err}"))?,
            form_config: FormConfig::new(version, self.form_config)
                .map_err(|err| format!("stored form config: {err}"))?,
            created_by: UserId::from_uuid(self.created_by),
        })
    }
}

// ---------------------------------------------------------------------------
// Referral requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = referral_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReferralRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub status: String,
    pub candidate_name: String,
    pub candidate_contact: String,
    pub resume_link: String,
    pub job_link: String,
    pub motivation: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = referral_requests)]
pub(crate) struct NewReferralRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub status: &'a str,
    pub candidate_name: &'a str,
    pub candidate_contact: &'a str,
    pub resume_link: &'a str,
    pub job_link: &'a str,
    pub motivation: &'a str,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewReferralRow<'a> {
    pub fn from_domain(request: &'a NewReferralRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            student_id: *request.student_id.as_uuid(),
            employee_id: request.employee_id.map(|id| *id.as_uuid()),
            company_id: Some(*request.company_id.as_uuid()),
            status: ReferralStatus::Pending.as_str(),
            candidate_name: request.candidate.name(),
            candidate_contact: request.candidate.contact(),
            resume_link: request.candidate.resume_link(),
            job_link: request.candidate.job_link(),
            motivation: request.candidate.motivation(),
            expires_at: request.expires_at,
            created_at: request.created_at,
            updated_at: request.created_at,
        }
    }
}

impl ReferralRow {
    pub fn into_domain(self) -> Result<ReferralRequest, String> {
        let status = self
            .status
            .parse()
            .map_err(|err| format!("stored referral status: {err}"))?;
        Ok(ReferralRequest {
            id: ReferralRequestId::from_uuid(self.id),
            student_id: UserId::from_uuid(self.student_id),
            employee_id: self.employee_id.map(UserId::from_uuid),
            company_id: self.company_id.map(CompanyId::from_uuid),
            status,
            candidate: CandidateDetails::from_stored(
                self.candidate_name,
                self.candidate_contact,
                self.resume_link,
                self.job_link,
                self.motivation,
            ),
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: &'a str,
    pub kind: &'a str,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewNotificationRow<'a> {
    pub fn from_domain(notification: &'a Notification) -> Self {
        Self {
            id: *notification.id.as_uuid(),
            user_id: *notification.user_id.as_uuid(),
            message: &notification.message,
            kind: notification.kind.as_str(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

impl NotificationRow {
    pub fn into_domain(self) -> Result<Notification, String> {
        let kind = NotificationKind::from_stored(&self.kind)
            .ok_or_else(|| format!("stored notification kind '{}'", self.kind))?;
        Ok(Notification {
            id: NotificationId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            message: self.message,
            kind,
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}
