//! PostgreSQL-backed `ReferralRepository` implementation using Diesel ORM.
//!
//! `try_decide` is a single conditional `UPDATE ... RETURNING`: the row only
//! changes while it is pending, unexpired and open to the caller, so two
//! employees racing for one broadcast request cannot both win.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DecisionAttempt, ReferralRepository, ReferralRepositoryError};
use crate::domain::{
    CompanyId, CompanyName, CompanySummary, NewReferralRequest, PartySummary, PersonName,
    ReferralOverview, ReferralRequest, ReferralRequestId, ReferralStatus, UserId,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{CompanyNameRow, NewReferralRow, ReferralRow, UserNameRow};
use super::pool::{DbPool, PoolError};
use super::schema::{companies, referral_requests, users};

const ONE_PENDING_PER_PAIR: &str = "referral_requests_one_pending_per_pair";

/// Diesel-backed implementation of the `ReferralRepository` port.
#[derive(Clone)]
pub struct DieselReferralRepository {
    pool: DbPool,
}

impl DieselReferralRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReferralRepositoryError {
    map_basic_pool_error(error, ReferralRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReferralRepositoryError {
    if unique_violation(&error).is_some_and(|constraint| constraint == ONE_PENDING_PER_PAIR) {
        return ReferralRepositoryError::duplicate_pending();
    }
    map_basic_diesel_error(
        error,
        ReferralRepositoryError::query,
        ReferralRepositoryError::connection,
    )
}

fn row_to_request(row: ReferralRow) -> Result<ReferralRequest, ReferralRepositoryError> {
    row.into_domain().map_err(ReferralRepositoryError::query)
}

/// Attach student, employee and company names to listed requests.
async fn decorate(
    conn: &mut AsyncPgConnection,
    rows: Vec<ReferralRow>,
) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
    let user_ids: HashSet<Uuid> = rows
        .iter()
        .flat_map(|row| std::iter::once(row.student_id).chain(row.employee_id))
        .collect();
    let company_ids: HashSet<Uuid> = rows.iter().filter_map(|row| row.company_id).collect();

    let people: HashMap<Uuid, String> = users::table
        .filter(users::id.eq_any(user_ids.into_iter().collect::<Vec<_>>()))
        .select(UserNameRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| (row.id, row.name))
        .collect();
    let firms: HashMap<Uuid, String> = companies::table
        .filter(companies::id.eq_any(company_ids.into_iter().collect::<Vec<_>>()))
        .select(CompanyNameRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| (row.id, row.name))
        .collect();

    let party = |id: Uuid| -> Result<Option<PartySummary>, ReferralRepositoryError> {
        people
            .get(&id)
            .map(|name| {
                PersonName::new(name)
                    .map(|name| PartySummary {
                        id: UserId::from_uuid(id),
                        name,
                    })
                    .map_err(|err| ReferralRepositoryError::query(format!("stored name: {err}")))
            })
            .transpose()
    };

    rows.into_iter()
        .map(|row| {
            let student = party(row.student_id)?.ok_or_else(|| {
                ReferralRepositoryError::query(format!("student {} missing", row.student_id))
            })?;
            let employee = row.employee_id.map(party).transpose()?.flatten();
            let company = row
                .company_id
                .and_then(|id| firms.get(&id).map(|name| (id, name)))
                .map(|(id, name)| {
                    CompanyName::new(name)
                        .map(|name| CompanySummary {
                            id: CompanyId::from_uuid(id),
                            name,
                        })
                        .map_err(|err| {
                            ReferralRepositoryError::query(format!("stored company name: {err}"))
                        })
                })
                .transpose()?;
            Ok(ReferralOverview {
                request: row_to_request(row)?,
                student,
                employee,
                company,
            })
        })
        .collect()
}

#[async_trait]
impl ReferralRepository for DieselReferralRepository {
    async fn create(
        &self,
        request: &NewReferralRequest,
    ) -> Result<ReferralRequest, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ReferralRow = diesel::insert_into(referral_requests::table)
            .values(NewReferralRow::from_domain(request))
            .returning(ReferralRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_request(row)
    }

    async fn find_by_id(
        &self,
        id: &ReferralRequestId,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ReferralRow> = referral_requests::table
            .filter(referral_requests::id.eq(*id.as_uuid()))
            .filter(referral_requests::deleted_at.is_null())
            .select(ReferralRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn try_decide(
        &self,
        attempt: &DecisionAttempt,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let caller = *attempt.employee_id.as_uuid();
        let caller_company = *attempt.company_id.as_uuid();

        let open_to_caller = referral_requests::employee_id.eq(caller).or(
            referral_requests::employee_id
                .is_null()
                .and(referral_requests::company_id.eq(caller_company)),
        );
        let row: Option<ReferralRow> = diesel::update(
            referral_requests::table
                .filter(referral_requests::id.eq(*attempt.request_id.as_uuid()))
                .filter(referral_requests::status.eq(ReferralStatus::Pending.as_str()))
                .filter(referral_requests::expires_at.gt(attempt.now))
                .filter(referral_requests::deleted_at.is_null())
                .filter(open_to_caller),
        )
        .set((
            referral_requests::status.eq(attempt.status.as_str()),
            referral_requests::employee_id.eq(Some(caller)),
            referral_requests::updated_at.eq(attempt.now),
        ))
        .returning(ReferralRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_request).transpose()
    }

    async fn expire_elapsed(&self, now: DateTime<Utc>) -> Result<u64, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            referral_requests::table
                .filter(referral_requests::status.eq(ReferralStatus::Pending.as_str()))
                .filter(referral_requests::expires_at.le(now))
                .filter(referral_requests::deleted_at.is_null()),
        )
        .set((
            referral_requests::status.eq(ReferralStatus::Expired.as_str()),
            referral_requests::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(updated).unwrap_or(u64::MAX))
    }

    async fn list_for_employee(
        &self,
        employee_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let visible = referral_requests::employee_id.eq(*employee_id.as_uuid()).or(
            referral_requests::employee_id
                .is_null()
                .and(referral_requests::company_id.eq(*company_id.as_uuid())),
        );
        let rows: Vec<ReferralRow> = referral_requests::table
            .filter(referral_requests::deleted_at.is_null())
            .filter(visible)
            .order(referral_requests::created_at.desc())
            .select(ReferralRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decorate(&mut conn, rows).await
    }

    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReferralRow> = referral_requests::table
            .filter(referral_requests::student_id.eq(*student_id.as_uuid()))
            .filter(referral_requests::deleted_at.is_null())
            .order(referral_requests::created_at.desc())
            .select(ReferralRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decorate(&mut conn, rows).await
    }
}
