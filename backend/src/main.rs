//! Service entry-point: loads configuration, wires adapters and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use referrals::inbound::http::auth_config::fingerprint::secret_fingerprint;
use referrals::inbound::http::auth_config::{BuildMode, signing_secret_from_env};
use referrals::inbound::http::health::HealthState;
use referrals::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let secret = signing_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("failed to resolve JWT signing secret")?;
    info!(fingerprint = %secret_fingerprint(&secret), "JWT signing secret loaded");

    let mut config = ServerConfig::new(settings.bind_addr(), secret);
    if let Some(url) = settings.database_url() {
        run_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
