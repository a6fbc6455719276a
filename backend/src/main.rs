//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinic_backend::domain::ports::FixedCredentialVerifier;
use clinic_backend::inbound::http::health::HealthState;
use clinic_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
use clinic_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let credentials = Arc::new(FixedCredentialVerifier::new(
        settings.admin_username(),
        settings.admin_password().map_err(std::io::Error::other)?,
    ));
    let token = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr, token, credentials);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting clinic backend");
    create_server(health_state, config)?.await
}

/// Apply pending migrations, then open and check the connection pool.
async fn prepare_database(database_url: &str) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    pool.ping().await.map_err(std::io::Error::other)?;
    Ok(pool)
}
