//! Building blocks for HTTP APIs on axum and sqlx/PostgreSQL
//!
//! - [`pagination`]: allow-listed filtering, sorting and paging of list
//!   queries from request parameters
//! - [`api`]: JSON error responses, machine key middleware, validating
//!   extractors and server startup
//! - [`core`]: environment configuration, connection strings, logging and
//!   shutdown signalling
//! - [`data`]: PostgreSQL and Valkey connection pools
//! - [`utils`]: AES-GCM encryption, string case helpers and validators

pub mod api;
pub mod core;
pub mod data;
pub mod pagination;
pub mod utils;
