//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache configuration error: {0}")]
    Config(String),

    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Valkey error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    #[error("Valkey pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
}
