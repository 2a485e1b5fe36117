//! Service entry-point: loads settings, prepares the store, and runs the
//! HTTP server.

mod server;

use std::ffi::OsString;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use school::inbound::http::health::HealthState;
use school::outbound::persistence::{DbPool, run_pending_migrations};
use school::settings::AppSettings;

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .wrap_err("failed to load settings")?;
    let key = settings.session_key()?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(key, settings.cookie_secure(), SameSite::Lax, bind_addr);

    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations() {
            let url = pool_config.database_url().to_owned();
            let applied = web::block(move || run_pending_migrations(&url))
                .await
                .wrap_err("migration task failed")??;
            info!(applied, "database migrations complete");
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result?;
    Ok(())
}
