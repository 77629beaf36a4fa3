//! Referral workflow service.
//!
//! Creation, decisions and listings all start by lapsing overdue pending
//! requests, so no reader observes a pending request past its deadline.
//! Decisions are settled by the repository's compare-and-set; when it matches
//! nothing the request is re-read and the failure classified with
//! [`ReferralRequest::check_decider`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::account_service::{map_company_error, map_user_error};
use crate::domain::ports::{
    CompanyRepository, CreateReferral, DecisionAttempt, NotificationRepository, ReferralCommand,
    ReferralQuery, ReferralRepository, ReferralRepositoryError, UserRepository,
};
use crate::domain::{
    Decision, DecisionRejection, EmployeePrincipal, Error, NewReferralRequest, Notification,
    ReferralOverview, ReferralRequest, ReferralRequestId, ReferralTarget, StudentPrincipal,
};

pub(crate) fn map_referral_error(error: ReferralRepositoryError) -> Error {
    match error {
        ReferralRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("referral repository unavailable: {message}"))
        }
        ReferralRepositoryError::Query { message } => {
            Error::internal(format!("referral repository error: {message}"))
        }
        ReferralRepositoryError::DuplicatePending => {
            Error::conflict("you already have a pending request with this employee")
                .with_details(json!({ "code": "duplicate_pending" }))
        }
    }
}

fn rejection_error(rejection: DecisionRejection, decision: Decision) -> Error {
    match (rejection, decision) {
        (DecisionRejection::ClaimedByOther, Decision::Accept) => {
            Error::conflict("request has already been claimed by another employee")
        }
        (DecisionRejection::ClaimedByOther, Decision::Reject) => {
            Error::forbidden("request is assigned to another employee")
        }
        (DecisionRejection::OutsideCompany, _) => {
            Error::forbidden("request is addressed to a different company")
        }
        (DecisionRejection::AlreadyDecided(status), _) => {
            Error::conflict(format!("request is already {status}"))
                .with_details(json!({ "status": status.as_str() }))
        }
        (DecisionRejection::Expired, _) => Error::conflict("request has expired")
            .with_details(json!({ "status": "expired" })),
    }
}

/// Referral workflow service implementing [`ReferralCommand`] and
/// [`ReferralQuery`].
#[derive(Clone)]
pub struct ReferralService<R, U, C, N> {
    referrals: Arc<R>,
    users: Arc<U>,
    companies: Arc<C>,
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R, U, C, N> ReferralService<R, U, C, N> {
    pub fn new(
        referrals: Arc<R>,
        users: Arc<U>,
        companies: Arc<C>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            referrals,
            users,
            companies,
            notifications,
            clock,
        }
    }
}

impl<R, U, C, N> ReferralService<R, U, C, N>
where
    R: ReferralRepository,
    U: UserRepository,
    C: CompanyRepository,
    N: NotificationRepository,
{
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<(), Error> {
        let expired = self
            .referrals
            .expire_elapsed(now)
            .await
            .map_err(map_referral_error)?;
        if expired > 0 {
            debug!(expired, "lapsed overdue referral requests");
        }
        Ok(())
    }

    /// Record a notification without failing the surrounding transition.
    async fn notify(&self, notification: Notification) {
        if let Err(error) = self.notifications.append(&notification).await {
            warn!(
                user_id = %notification.user_id,
                %error,
                "failed to record notification"
            );
        }
    }

    async fn build_request(
        &self,
        student: &StudentPrincipal,
        request: CreateReferral,
        now: DateTime<Utc>,
    ) -> Result<NewReferralRequest, Error> {
        match request.target {
            ReferralTarget::Employee(employee_id) => {
                let company_id = self
                    .users
                    .find_by_id(&employee_id)
                    .await
                    .map_err(map_user_error)?
                    .and_then(|user| user.company_id())
                    .ok_or_else(|| Error::not_found(format!("employee {employee_id} not found")))?;
                Ok(NewReferralRequest::new(
                    student.id,
                    Some(employee_id),
                    company_id,
                    request.candidate,
                    now,
                ))
            }
            ReferralTarget::Company(company_id) => {
                self.companies
                    .find_by_id(&company_id)
                    .await
                    .map_err(map_company_error)?
                    .ok_or_else(|| Error::not_found(format!("company {company_id} not found")))?;
                Ok(NewReferralRequest::new(
                    student.id,
                    None,
                    company_id,
                    request.candidate,
                    now,
                ))
            }
        }
    }

    async fn load(&self, request_id: &ReferralRequestId) -> Result<ReferralRequest, Error> {
        self.referrals
            .find_by_id(request_id)
            .await
            .map_err(map_referral_error)?
            .ok_or_else(|| Error::not_found(format!("referral request {request_id} not found")))
    }
}

#[async_trait]
impl<R, U, C, N> ReferralCommand for ReferralService<R, U, C, N>
where
    R: ReferralRepository,
    U: UserRepository,
    C: CompanyRepository,
    N: NotificationRepository,
{
    async fn create(
        &self,
        student: &StudentPrincipal,
        request: CreateReferral,
    ) -> Result<ReferralRequest, Error> {
        let now = self.clock.utc();
        self.expire_overdue(now).await?;

        let new_request = self.build_request(student, request, now).await?;
        let created = self
            .referrals
            .create(&new_request)
            .await
            .map_err(map_referral_error)?;

        if let Some(employee_id) = created.employee_id {
            self.notify(Notification::request_received(
                employee_id,
                &student.name,
                now,
            ))
            .await;
        }
        Ok(created)
    }

    async fn decide(
        &self,
        employee: &EmployeePrincipal,
        request_id: &ReferralRequestId,
        decision: Decision,
    ) -> Result<ReferralRequest, Error> {
        let now = self.clock.utc();
        self.expire_overdue(now).await?;

        let current = self.load(request_id).await?;
        current
            .check_decider(employee.id, employee.company_id, now)
            .map_err(|rejection| rejection_error(rejection, decision))?;

        let attempt = DecisionAttempt {
            request_id: *request_id,
            employee_id: employee.id,
            company_id: employee.company_id,
            status: decision.target_status(),
            now,
        };
        let Some(decided) = self
            .referrals
            .try_decide(&attempt)
            .await
            .map_err(map_referral_error)?
        else {
            // Lost a race between the check and the update.
            let latest = self.load(request_id).await?;
            latest
                .check_decider(employee.id, employee.company_id, now)
                .map_err(|rejection| rejection_error(rejection, decision))?;
            return Err(Error::conflict("request changed while being decided"));
        };

        self.notify(Notification::status_update(
            decided.student_id,
            decided.status,
            &employee.name,
            now,
        ))
        .await;
        Ok(decided)
    }
}

#[async_trait]
impl<R, U, C, N> ReferralQuery for ReferralService<R, U, C, N>
where
    R: ReferralRepository,
    U: UserRepository,
    C: CompanyRepository,
    N: NotificationRepository,
{
    async fn for_employee(
        &self,
        employee: &EmployeePrincipal,
    ) -> Result<Vec<ReferralOverview>, Error> {
        self.expire_overdue(self.clock.utc()).await?;
        self.referrals
            .list_for_employee(&employee.id, &employee.company_id)
            .await
            .map_err(map_referral_error)
    }

    async fn for_student(
        &self,
        student: &StudentPrincipal,
    ) -> Result<Vec<ReferralOverview>, Error> {
        self.expire_overdue(self.clock.utc()).await?;
        self.referrals
            .list_for_student(&student.id)
            .await
            .map_err(map_referral_error)
    }
}

#[cfg(test)]
#[path = "referral_service_tests.rs"]
mod tests;
