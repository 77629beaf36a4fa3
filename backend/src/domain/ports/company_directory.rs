//! Driving port for the company directory.

use async_trait::async_trait;

use crate::domain::{Company, EmployeePrincipal, Error, FormConfig};

/// Upper bound on search results.
pub const COMPANY_SEARCH_LIMIT: usize = 25;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// Companies whose name contains `query`, ordered by name and capped at
    /// [`COMPANY_SEARCH_LIMIT`].
    async fn search(&self, query: &str) -> Result<Vec<Company>, Error>;

    /// Replace the form configuration of the employee's company.
    async fn update_form(
        &self,
        employee: &EmployeePrincipal,
        config: FormConfig,
    ) -> Result<Company, Error>;
}
