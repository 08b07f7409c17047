//! Backend entry-point: loads settings, prepares storage, and runs the server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::outbound::storage::DirectoryImageStore;
use server::{AppSettings, BookingSettings, ServerConfig, create_server};

/// Application bootstrap.
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

    let settings = AppSettings::load().wrap_err("load server settings")?;
    let booking = BookingSettings::load().wrap_err("load booking settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("session configuration")?;

    let images = DirectoryImageStore::new(&settings.image_dir(), settings.image_base_url())
        .wrap_err("open image directory")?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
        images,
    )
    .with_policy(booking.policy()?)
    .with_origins(settings.allowed_origins()?)
    .with_development_accounts(cfg!(debug_assertions) || settings.database_url.is_none());

    match settings.database_url.clone() {
        Some(url) => {
            if settings.run_migrations {
                run_pending_migrations(url.clone()).await?;
            }
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_size())).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("HOTEL_DATABASE_URL unset; serving from in-memory storage"),
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::make_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting hotel booking backend");
    create_server(health_state, config).await?.await?;
    Ok(())
}
