//! Connection pools for PostgreSQL and Valkey

pub mod cache;
pub mod postgres;

pub use cache::{CacheError, ValkeyCache};
pub use postgres::{PgPool, PostgresError, PostgresService};
