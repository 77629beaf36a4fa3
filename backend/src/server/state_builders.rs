//! Adapter selection for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use referrals::inbound::http::auth_config::SigningSecret;
use referrals::inbound::http::state::{HttpState, HttpStatePorts, Repositories};
use referrals::outbound::memory::InMemoryStore;
use referrals::outbound::persistence::{
    DbPool, DieselCompanyRepository, DieselNotificationRepository, DieselReferralRepository,
    DieselUserRepository,
};
use referrals::outbound::security::{Argon2PasswordHasher, JwtTokenService};

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselCompanyRepository,
    DieselReferralRepository,
    DieselNotificationRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        companies: Arc::new(DieselCompanyRepository::new(pool.clone())),
        referrals: Arc::new(DieselReferralRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
    }
}

fn memory_repositories()
-> Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    Repositories {
        users: store.clone(),
        companies: store.clone(),
        referrals: store.clone(),
        notifications: store,
    }
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a process-local store that is lost on restart.
pub(crate) fn build_http_state(
    db_pool: Option<&DbPool>,
    signing_secret: &SigningSecret,
) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenService::new(
        signing_secret.as_bytes(),
        clock.clone(),
    ));
    let ports = match db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            HttpStatePorts::from_repositories(diesel_repositories(pool), hasher, tokens, clock)
        }
        None => {
            warn!("no database configured; using in-memory repositories");
            HttpStatePorts::from_repositories(memory_repositories(), hasher, tokens, clock)
        }
    };
    web::Data::new(HttpState::new(ports))
}
