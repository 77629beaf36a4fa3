//! PostgreSQL-backed `CompanyRepository` implementation using Diesel ORM.
//!
//! The domain lock is `INSERT ... ON CONFLICT (name) DO NOTHING` followed by a
//! read of the row holding the name, so concurrent first signups for one
//! company agree on a single locked domain.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CompanyRepository, CompanyRepositoryError};
use crate::domain::{Company, CompanyId, FormConfig, NewCompany};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{CompanyRow, NewCompanyRow};
use super::pool::{DbPool, PoolError};
use super::schema::companies;

/// Diesel-backed implementation of the `CompanyRepository` port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CompanyRepositoryError {
    map_basic_pool_error(error, CompanyRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CompanyRepositoryError {
    map_basic_diesel_error(
        error,
        CompanyRepositoryError::query,
        CompanyRepositoryError::connection,
    )
}

fn row_to_company(row: CompanyRow) -> Result<Company, CompanyRepositoryError> {
    row.into_domain().map_err(CompanyRepositoryError::query)
}

/// Case-insensitive `ILIKE` pattern matching `query` as a literal substring.
fn substring_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn lock_domain(&self, company: &NewCompany) -> Result<Company, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(companies::table)
            .values(NewCompanyRow::from_domain(company))
            .on_conflict(companies::name)
            .do_nothing()
            .execute(&mut conn)
            .await;
        if let Err(error) = inserted {
            if unique_violation(&error).is_some_and(|constraint| constraint.contains("domain")) {
                return Err(CompanyRepositoryError::domain_taken(company.domain.as_ref()));
            }
            return Err(map_diesel_error(error));
        }

        let row: CompanyRow = companies::table
            .filter(companies::name.eq(company.name.as_ref()))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_company(row)
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = companies::table
            .filter(companies::id.eq(*id.as_uuid()))
            .filter(companies::deleted_at.is_null())
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_company).transpose()
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CompanyRow> = companies::table
            .filter(companies::name.ilike(substring_pattern(query)))
            .filter(companies::deleted_at.is_null())
            .order(companies::name.asc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_company).collect()
    }

    async fn update_form(
        &self,
        id: &CompanyId,
        config: &FormConfig,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = diesel::update(
            companies::table
                .filter(companies::id.eq(*id.as_uuid()))
                .filter(companies::deleted_at.is_null()),
        )
        .set((
            companies::form_config.eq(config.to_value()),
            companies::form_schema_version.eq(i32::from(config.schema_version())),
            companies::updated_at.eq(Utc::now()),
        ))
        .returning(CompanyRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_company).transpose()
    }
}
