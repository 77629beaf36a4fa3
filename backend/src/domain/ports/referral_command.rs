//! Driving port for creating and deciding referral requests.

use async_trait::async_trait;

use crate::domain::{
    CandidateDetails, Decision, EmployeePrincipal, Error, ReferralRequest, ReferralRequestId,
    ReferralTarget, StudentPrincipal,
};

/// A validated request to open a referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReferral {
    pub target: ReferralTarget,
    pub candidate: CandidateDetails,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralCommand: Send + Sync {
    /// Open a pending request addressed to an employee or a company.
    ///
    /// # Errors
    ///
    /// - `not_found` when the target does not exist.
    /// - `conflict` when a pending direct request to the same employee exists.
    async fn create(
        &self,
        student: &StudentPrincipal,
        request: CreateReferral,
    ) -> Result<ReferralRequest, Error>;

    /// Accept or reject a pending request, claiming it when unassigned.
    ///
    /// # Errors
    ///
    /// - `not_found` for an unknown request.
    /// - `conflict` when another employee owns it (accept) or it is no longer
    ///   pending.
    /// - `forbidden` when another employee owns it (reject) or it belongs to a
    ///   different company.
    async fn decide(
        &self,
        employee: &EmployeePrincipal,
        request_id: &ReferralRequestId,
        decision: Decision,
    ) -> Result<ReferralRequest, Error>;
}
