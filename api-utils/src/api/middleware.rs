//! HTTP middleware (machine key auth, 404 handler)

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::types::{ApiError, codes, error_response};
use crate::core::config::{ConfigError, machine_key_from_env};
use crate::core::constants::MACHINE_KEY_HEADER;
use crate::utils::crypto::constant_time_eq;

/// Shared secret for service-to-service calls
#[derive(Clone)]
pub struct MachineKey {
    key: Arc<str>,
}

impl MachineKey {
    pub fn new(key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            key: Arc::from(key),
        }
    }

    /// Read `MACHINE_KEY` from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        machine_key_from_env().map(Self::new)
    }

    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && constant_time_eq(&self.key, candidate)
    }
}

impl std::fmt::Debug for MachineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MachineKey([redacted])")
    }
}

/// Require a valid `x-machine-key` header.
///
/// ```ignore
/// let internal = Router::new()
///     .route("/sync", post(sync))
///     .layer(axum::middleware::from_fn_with_state(key, machine_protected));
/// ```
pub async fn machine_protected(
    State(machine_key): State<MachineKey>,
    request: Request,
    next: Next,
) -> Response {
    if machine_key.key.is_empty() {
        tracing::error!("MACHINE_KEY is not configured");
        return ApiError::internal("Machine key is not configured.").into_response();
    }

    let header_key = request
        .headers()
        .get(MACHINE_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !machine_key.matches(header_key) {
        tracing::debug!(path = %request.uri().path(), "Rejected invalid machine key");
        return ApiError::unauthorized("Machine key is invalid.").into_response();
    }

    next.run(request).await
}

/// Fallback for unknown routes
pub async fn not_found(request: Request) -> Response {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "[404]");
    error_response(
        StatusCode::NOT_FOUND,
        codes::NOT_FOUND,
        "sorry, endpoint is not found",
    )
}
