//! Shared API error types
//!
//! Every error response has the same JSON shape:
//! `{ "code": "<error code>", "message": "<human readable message>" }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::pagination::QueryErrors;

/// Error codes used in the `code` field of error responses
pub mod codes {
    pub const NOT_FOUND: &str = "notFound";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const INTERNAL_SERVER_ERROR: &str = "internalServerError";
    pub const BODY_PARSE: &str = "bodyParse";
    pub const VALIDATOR: &str = "validator";
    pub const QUERY_ERROR: &str = "queryError";
    pub const CACHE_ERROR: &str = "cacheError";
    pub const FORBIDDEN: &str = "forbidden";
    pub const MISSING_REQUIRED_PARAM: &str = "missingRequiredParam";
    pub const INVALID_PARAM: &str = "invalidParam";
    pub const OUT_OF_SYNC: &str = "outOfSync";
}

/// Standard API error response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_SERVER_ERROR,
            message,
        )
    }

    /// Log a database error and hide its details from the client
    pub fn from_query(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "Query error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::QUERY_ERROR,
            "Database operation failed",
        )
    }

    /// Log a cache error and hide its details from the client
    pub fn from_cache(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "Cache error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::CACHE_ERROR,
            "Cache operation failed",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status, &self.code, &self.message)
    }
}

/// Rejected filter clauses fail the whole request
impl From<QueryErrors> for ApiError {
    fn from(errors: QueryErrors) -> Self {
        Self::bad_request(codes::INVALID_PARAM, errors.to_string())
    }
}

/// `{ "code": code, "message": message }` with the given status
pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "code": code,
            "message": message,
        })),
    )
        .into_response()
}

/// Turn any handler error into a JSON error response.
///
/// An [`ApiError`] anywhere in the chain keeps its status and code; anything
/// else becomes a 500 `internalServerError` carrying the error message.
pub fn handle_error(err: anyhow::Error) -> Response {
    if let Some(api_error) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        return api_error.clone().into_response();
    }

    tracing::error!(error = %err, "Unhandled error");
    ApiError::internal(err.to_string()).into_response()
}
