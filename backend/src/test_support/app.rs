//! In-memory application state with real credential adapters.

use std::sync::Arc;

use mockable::Clock;

use crate::inbound::http::state::{HttpState, HttpStatePorts, Repositories};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::MutableClock;

/// Signing secret used by test tokens.
pub const TEST_SECRET: &[u8] = b"referrals-test-secret-of-32-bytes!!";

/// Handler state over one shared [`InMemoryStore`], Argon2 hashing and
/// HS256 tokens, all reading time from `clock`.
pub fn memory_state(clock: Arc<MutableClock>) -> (HttpState, InMemoryStore) {
    let store = InMemoryStore::new();
    let shared = Arc::new(store.clone());
    let clock: Arc<dyn Clock> = clock;
    let ports = HttpStatePorts::from_repositories(
        Repositories {
            users: shared.clone(),
            companies: shared.clone(),
            referrals: shared.clone(),
            notifications: shared,
        },
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(TEST_SECRET, clock.clone())),
        clock,
    );
    (HttpState::new(ports), store)
}
