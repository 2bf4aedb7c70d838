//! User directory server: REST API, static front-end and OpenAPI docs.

mod server;

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_directory::outbound::persistence::{DbPool, PoolConfig, apply_schema};

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

    let config = ServerConfig::from_env(&DefaultEnv::new())?;
    let pool_config = PoolConfig::new(config.database_url.clone())
        .with_max_size(config.pool_max_size)
        .with_connection_timeout(config.connect_timeout);
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    apply_schema(&pool)
        .await
        .wrap_err("failed to apply database schema")?;
    info!("database schema ready");

    let server = create_server(&config, pool)?;
    server.await?;
    Ok(())
}
