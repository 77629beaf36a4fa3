//! Port abstraction for referral request storage.
//!
//! Adapters own the compare-and-set that decides a request: `try_decide` must
//! apply the transition only while the request is still pending, unexpired
//! and decidable by the caller, and must do so atomically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CompanyId, NewReferralRequest, ReferralOverview, ReferralRequest, ReferralRequestId,
    ReferralStatus, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by referral repository adapters.
    pub enum ReferralRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "referral repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "referral repository query failed: {message}",
        /// The student already has a pending request with this employee.
        DuplicatePending => "a pending request to this employee already exists",
    }
}

/// A conditional transition requested by an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionAttempt {
    pub request_id: ReferralRequestId,
    pub employee_id: UserId,
    pub company_id: CompanyId,
    pub status: ReferralStatus,
    pub now: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Persist a new pending request.
    async fn create(
        &self,
        request: &NewReferralRequest,
    ) -> Result<ReferralRequest, ReferralRepositoryError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: &ReferralRequestId,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError>;

    /// Apply the decision if and only if the request is still open to the
    /// caller. Sets the employee to the caller. Returns `None` when no row
    /// matched.
    async fn try_decide(
        &self,
        attempt: &DecisionAttempt,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError>;

    /// Move pending requests past their deadline to `Expired`.
    async fn expire_elapsed(&self, now: DateTime<Utc>) -> Result<u64, ReferralRepositoryError>;

    /// Requests assigned to the employee plus unclaimed requests for their
    /// company, newest first.
    async fn list_for_employee(
        &self,
        employee_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError>;

    /// Requests created by the student, newest first.
    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError>;
}
