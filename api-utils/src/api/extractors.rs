//! Validating extractors

use std::ops::Deref;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::types::{ApiError, codes};
use crate::utils::validation::format_validation_errors;

/// Query extractor with automatic validation.
///
/// Parse failures answer 400 `invalidParam`, failed constraints 400
/// `validator`.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(codes::INVALID_PARAM, e.body_text()))?;
        value.validate().map_err(|e| {
            ApiError::bad_request(codes::VALIDATOR, format_validation_errors(&e))
        })?;
        Ok(Self(value))
    }
}

/// JSON body extractor with automatic validation.
///
/// Unparsable bodies answer 400 `bodyParse`, failed constraints 400
/// `validator`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(codes::BODY_PARSE, e.body_text()))?;
        value.validate().map_err(|e| {
            ApiError::bad_request(codes::VALIDATOR, format_validation_errors(&e))
        })?;
        Ok(Self(value))
    }
}
