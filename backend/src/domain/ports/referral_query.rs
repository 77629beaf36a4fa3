//! Driving port for referral request listings.

use async_trait::async_trait;

use crate::domain::{EmployeePrincipal, Error, ReferralOverview, StudentPrincipal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralQuery: Send + Sync {
    /// Requests assigned to the employee or open to their company.
    async fn for_employee(
        &self,
        employee: &EmployeePrincipal,
    ) -> Result<Vec<ReferralOverview>, Error>;

    /// Requests the student has made.
    async fn for_student(&self, student: &StudentPrincipal)
    -> Result<Vec<ReferralOverview>, Error>;
}
