//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, credential adapters) are implemented in
//! `outbound`; driving ports (commands, queries) are implemented by the
//! domain services and consumed by `inbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod company_directory;
mod company_repository;
mod notification_inbox;
mod notification_repository;
mod password_hasher;
mod principal_resolver;
mod referral_command;
mod referral_query;
mod referral_repository;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use company_directory::MockCompanyDirectory;
pub use company_directory::{COMPANY_SEARCH_LIMIT, CompanyDirectory};
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use company_repository::{CompanyRepository, CompanyRepositoryError};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use principal_resolver::MockPrincipalResolver;
pub use principal_resolver::PrincipalResolver;
#[cfg(test)]
pub use referral_command::MockReferralCommand;
pub use referral_command::{CreateReferral, ReferralCommand};
#[cfg(test)]
pub use referral_query::MockReferralQuery;
pub use referral_query::ReferralQuery;
#[cfg(test)]
pub use referral_repository::MockReferralRepository;
pub use referral_repository::{DecisionAttempt, ReferralRepository, ReferralRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
