//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see domain
//! ports, so they stay testable with mocks or in-memory adapters.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, CompanyDirectory, CompanyRepository, NotificationInbox,
    NotificationRepository, PasswordHasher, PrincipalResolver, ReferralCommand, ReferralQuery,
    ReferralRepository, TokenService, UserRepository,
};
use crate::domain::{AccountService, CompanyService, NotificationService, ReferralService};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub principals: Arc<dyn PrincipalResolver>,
    pub companies: Arc<dyn CompanyDirectory>,
    pub referrals: Arc<dyn ReferralCommand>,
    pub referrals_query: Arc<dyn ReferralQuery>,
    pub notifications: Arc<dyn NotificationInbox>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub principals: Arc<dyn PrincipalResolver>,
    pub companies: Arc<dyn CompanyDirectory>,
    pub referrals: Arc<dyn ReferralCommand>,
    pub referrals_query: Arc<dyn ReferralQuery>,
    pub notifications: Arc<dyn NotificationInbox>,
}

/// Driven adapters the domain services are built from.
pub struct Repositories<U, C, R, N> {
    pub users: Arc<U>,
    pub companies: Arc<C>,
    pub referrals: Arc<R>,
    pub notifications: Arc<N>,
}

impl HttpStatePorts {
    /// Wire the domain services over one set of repositories and credential
    /// adapters.
    pub fn from_repositories<U, C, R, N, H, T>(
        repositories: Repositories<U, C, R, N>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        C: CompanyRepository + 'static,
        R: ReferralRepository + 'static,
        N: NotificationRepository + 'static,
        H: PasswordHasher + 'static,
        T: TokenService + 'static,
    {
        let Repositories {
            users,
            companies,
            referrals,
            notifications,
        } = repositories;
        let accounts = Arc::new(AccountService::new(
            users.clone(),
            companies.clone(),
            hasher,
            tokens,
            clock.clone(),
        ));
        let workflow = Arc::new(ReferralService::new(
            referrals,
            users,
            companies.clone(),
            notifications.clone(),
            clock,
        ));
        Self {
            accounts: accounts.clone(),
            principals: accounts,
            companies: Arc::new(CompanyService::new(companies)),
            referrals: workflow.clone(),
            referrals_query: workflow,
            notifications: Arc::new(NotificationService::new(notifications)),
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            principals,
            companies,
            referrals,
            referrals_query,
            notifications,
        } = ports;
        Self {
            accounts,
            principals,
            companies,
            referrals,
            referrals_query,
            notifications,
        }
    }
}
