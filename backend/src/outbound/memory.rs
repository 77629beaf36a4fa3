//! Process-local implementations of the repository ports.
//!
//! Used when no database is configured and by integration tests. Every
//! repository shares one [`InMemoryStore`] so referral listings can be
//! decorated with user and company names, and all checks plus writes for an
//! operation happen under a single lock, mirroring the conditional SQL the
//! Diesel adapters issue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CompanyRepository, CompanyRepositoryError, DecisionAttempt, NotificationRepository,
    NotificationRepositoryError, ReferralRepository, ReferralRepositoryError, StoredCredentials,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Company, CompanyId, CompanySummary, EmailAddress, FormConfig, NewCompany, NewReferralRequest,
    Notification, NotificationId, PartySummary, ReferralOverview, ReferralRequest,
    ReferralRequestId, ReferralStatus, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, (User, String)>,
    companies: HashMap<CompanyId, Company>,
    referrals: HashMap<ReferralRequestId, ReferralRequest>,
    notifications: Vec<Notification>,
}

impl State {
    fn overview(&self, request: &ReferralRequest) -> Option<ReferralOverview> {
        let party = |id: &UserId| {
            self.users.get(id).map(|(user, _)| PartySummary {
                id: user.id,
                name: user.name.clone(),
            })
        };
        Some(ReferralOverview {
            request: request.clone(),
            student: party(&request.student_id)?,
            employee: request.employee_id.as_ref().and_then(party),
            company: request
                .company_id
                .and_then(|id| self.companies.get(&id))
                .map(|company| CompanySummary {
                    id: company.id,
                    name: company.name.clone(),
                }),
        })
    }

    fn overviews<'a>(
        &self,
        requests: impl Iterator<Item = &'a ReferralRequest>,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
        let mut listed = requests
            .map(|request| {
                self.overview(request).ok_or_else(|| {
                    ReferralRepositoryError::query(format!(
                        "student {} missing",
                        request.student_id
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        listed.sort_by(|a, b| {
            b.request
                .created_at
                .cmp(&a.request.created_at)
                .then_with(|| b.request.id.as_uuid().cmp(a.request.id.as_uuid()))
        });
        Ok(listed)
    }
}

/// Shared state behind every in-memory repository.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Each operation completes its writes before releasing the guard, so a
    // poisoned lock still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|(existing, _)| existing.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        state
            .users
            .insert(user.id, (user.clone(), password_hash.to_owned()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.get(id).map(|(user, _)| user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|(user, _)| &user.email == email)
            .map(|(user, password_hash)| StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            }))
    }

    async fn mark_verified(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.get_mut(id).map(|(user, _)| {
            user.is_verified = true;
            user.clone()
        }))
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn lock_domain(&self, company: &NewCompany) -> Result<Company, CompanyRepositoryError> {
        let mut state = self.lock();
        if let Some(existing) = state.companies.values().find(|c| c.name == company.name) {
            return Ok(existing.clone());
        }
        if state.companies.values().any(|c| c.domain == company.domain) {
            return Err(CompanyRepositoryError::domain_taken(company.domain.as_ref()));
        }
        let created = Company {
            id: company.id,
            name: company.name.clone(),
            domain: company.domain.clone(),
            form_config: company.form_config.clone(),
            created_by: company.created_by,
        };
        state.companies.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyRepositoryError> {
        Ok(self.lock().companies.get(id).cloned())
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let needle = query.to_lowercase();
        let mut found: Vec<Company> = self
            .lock()
            .companies
            .values()
            .filter(|c| c.name.as_ref().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
        found.truncate(limit);
        Ok(found)
    }

    async fn update_form(
        &self,
        id: &CompanyId,
        config: &FormConfig,
    ) -> Result<Option<Company>, CompanyRepositoryError> {
        Ok(self.lock().companies.get_mut(id).map(|company| {
            company.form_config = config.clone();
            company.clone()
        }))
    }
}

#[async_trait]
impl ReferralRepository for InMemoryStore {
    async fn create(
        &self,
        request: &NewReferralRequest,
    ) -> Result<ReferralRequest, ReferralRepositoryError> {
        let mut state = self.lock();
        if let Some(employee) = request.employee_id {
            let duplicate = state.referrals.values().any(|existing| {
                existing.status == ReferralStatus::Pending
                    && existing.student_id == request.student_id
                    && existing.employee_id == Some(employee)
            });
            if duplicate {
                return Err(ReferralRepositoryError::duplicate_pending());
            }
        }
        let stored = ReferralRequest {
            id: request.id,
            student_id: request.student_id,
            employee_id: request.employee_id,
            company_id: Some(request.company_id),
            status: ReferralStatus::Pending,
            candidate: request.candidate.clone(),
            expires_at: request.expires_at,
            created_at: request.created_at,
            updated_at: request.created_at,
        };
        state.referrals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: &ReferralRequestId,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError> {
        Ok(self.lock().referrals.get(id).cloned())
    }

    async fn try_decide(
        &self,
        attempt: &DecisionAttempt,
    ) -> Result<Option<ReferralRequest>, ReferralRepositoryError> {
        let mut state = self.lock();
        let Some(request) = state.referrals.get_mut(&attempt.request_id) else {
            return Ok(None);
        };
        if request
            .check_decider(attempt.employee_id, attempt.company_id, attempt.now)
            .is_err()
        {
            return Ok(None);
        }
        request.status = attempt.status;
        request.employee_id = Some(attempt.employee_id);
        request.updated_at = attempt.now;
        Ok(Some(request.clone()))
    }

    async fn expire_elapsed(&self, now: DateTime<Utc>) -> Result<u64, ReferralRepositoryError> {
        let mut state = self.lock();
        let mut expired = 0;
        for request in state.referrals.values_mut() {
            if request.status == ReferralStatus::Pending && request.is_past_deadline(now) {
                request.status = ReferralStatus::Expired;
                request.updated_at = now;
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn list_for_employee(
        &self,
        employee_id: &UserId,
        company_id: &CompanyId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
        let state = self.lock();
        state.overviews(
            state
                .referrals
                .values()
                .filter(|request| request.is_visible_to_employee(*employee_id, *company_id)),
        )
    }

    async fn list_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<ReferralOverview>, ReferralRepositoryError> {
        let state = self.lock();
        state.overviews(
            state
                .referrals
                .values()
                .filter(|request| &request.student_id == student_id),
        )
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.lock().notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        // Appends arrive in time order, so reversing gives newest first.
        Ok(self
            .lock()
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        Ok(self
            .lock()
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.user_id == user_id)
            .map(|n| {
                n.is_read = true;
                n.clone()
            }))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
