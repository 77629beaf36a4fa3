//! Company directory service: name search and form configuration updates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_company_error;
use crate::domain::ports::{COMPANY_SEARCH_LIMIT, CompanyDirectory, CompanyRepository};
use crate::domain::{Company, EmployeePrincipal, Error, FormConfig};

#[derive(Clone)]
pub struct CompanyService<C> {
    companies: Arc<C>,
}

impl<C> CompanyService<C> {
    pub fn new(companies: Arc<C>) -> Self {
        Self { companies }
    }
}

#[async_trait]
impl<C> CompanyDirectory for CompanyService<C>
where
    C: CompanyRepository,
{
    async fn search(&self, query: &str) -> Result<Vec<Company>, Error> {
        self.companies
            .search(query.trim(), COMPANY_SEARCH_LIMIT)
            .await
            .map_err(map_company_error)
    }

    async fn update_form(
        &self,
        employee: &EmployeePrincipal,
        config: FormConfig,
    ) -> Result<Company, Error> {
        self.companies
            .update_form(&employee.company_id, &config)
            .await
            .map_err(map_company_error)?
            .ok_or_else(|| Error::not_found(format!("company {} not found", employee.company_id)))
    }
}
