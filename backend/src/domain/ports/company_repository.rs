//! Port abstraction for the company directory store.

use async_trait::async_trait;

use crate::domain::{Company, CompanyId, FormConfig, NewCompany};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by company repository adapters.
    pub enum CompanyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "company repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "company repository query failed: {message}",
        /// The domain is already locked by a differently named company.
        DomainTaken { domain: String } => "domain {domain} is already registered to another company",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Register `company` unless one with the same name exists, then return
    /// whichever row holds that name.
    ///
    /// Concurrent callers with the same name all observe the same winner, so
    /// the domain is locked by exactly one of them.
    async fn lock_domain(&self, company: &NewCompany) -> Result<Company, CompanyRepositoryError>;

    /// Fetch a company by identifier.
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyRepositoryError>;

    /// Case-insensitive substring search on company names, ordered by name.
    async fn search(&self, query: &str, limit: usize)
    -> Result<Vec<Company>, CompanyRepositoryError>;

    /// Replace the form configuration, returning the updated company.
    async fn update_form(
        &self,
        id: &CompanyId,
        config: &FormConfig,
    ) -> Result<Option<Company>, CompanyRepositoryError>;
}
