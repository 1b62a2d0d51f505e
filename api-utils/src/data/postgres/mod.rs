//! PostgreSQL connection pool
//!
//! Built from [`PostgresConfig`]; the pool is checked with `SELECT 1` before
//! it is handed out.

pub mod error;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::DB_ACQUIRE_TIMEOUT_SECS;

/// PostgreSQL database service
///
/// Should be created once at startup and shared (the pool is cheap to clone).
#[derive(Debug, Clone)]
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect and ping the database. On a failed ping the pool is closed
    /// before the error is returned.
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let options = connect_options(config)?;
        let pool = pool_options(config).connect_with(options).await?;

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            pool.close().await;
            return Err(PostgresError::Ping(e.to_string()));
        }

        tracing::debug!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            max_lifetime_secs = config.max_lifetime_secs,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }
}

fn connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, PostgresError> {
    let url = config
        .url()
        .map_err(|e| PostgresError::Config(e.to_string()))?;
    let options: PgConnectOptions = url
        .parse()
        .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;
    Ok(options.log_statements(LevelFilter::Trace))
}

fn pool_options(config: &PostgresConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
}
