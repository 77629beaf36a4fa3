//! HTTP server configuration object.

use std::net::SocketAddr;

use referrals::inbound::http::auth_config::SigningSecret;
use referrals::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: SigningSecret,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) metrics_enabled: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: SigningSecret) -> Self {
        Self {
            bind_addr,
            signing_secret,
            db_pool: None,
            #[cfg(feature = "metrics")]
            metrics_enabled: true,
        }
    }

    /// Use PostgreSQL repositories instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}
