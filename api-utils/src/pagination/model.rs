//! Pagination arithmetic and the paginated response model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Maximum items per page
pub const MAX_PAGE_LIMIT: u32 = 500;
/// Default page number
pub const DEFAULT_PAGE: u32 = 1;
/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Number of pages needed to show `total` rows, `limit` per page.
///
/// `limit` is not guarded: callers validate it first (see [`PageParams`]).
pub fn page_count(total: i64, limit: i64) -> i64 {
    (total as f64 / limit as f64).ceil() as i64
}

/// Rows to skip before `page` (1-based).
///
/// Unchecked like `page_count`: extreme inputs overflow, so pass bounded
/// values (as [`PageParams::offset`] does).
pub fn offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// One page of results, serialized as
/// `{ "limit", "page", "pageCount", "total", "result" }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel<T> {
    limit: i64,
    page: i64,
    page_count: i64,
    total: i64,
    result: T,
}

impl<T> PaginationModel<T> {
    pub fn new(limit: i64, page: i64, page_count: i64, total: i64, result: T) -> Self {
        Self {
            limit,
            page,
            page_count,
            total,
            result,
        }
    }

    /// Build the model from a page request and the filtered row count,
    /// computing `pageCount`
    pub fn from_page(params: &PageParams, total: i64, result: T) -> Self {
        let limit = i64::from(params.limit);
        Self::new(
            limit,
            i64::from(params.page),
            page_count(total, limit),
            total,
            result,
        )
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn result(&self) -> &T {
        &self.result
    }

    pub fn into_result(self) -> T {
        self.result
    }
}

/// `page` and `limit` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct PageParams {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        offset(i64::from(self.page), i64::from(self.limit))
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for limit parameter
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::new("limit_range")
            .with_message(format!("Limit must be between 1 and {}", MAX_PAGE_LIMIT).into()));
    }
    Ok(())
}
