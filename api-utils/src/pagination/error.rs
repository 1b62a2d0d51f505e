//! Filter error types
//!
//! Errors are collected while a query is being built rather than returned
//! from the first failing clause, so one request reports every bad clause.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot parse invalid format: {clause}")]
    MalformedClause { clause: String },

    #[error("column not allowed: {column}")]
    ColumnNotAllowed { column: String },

    #[error("not exactly two values for between query on {column} (got {count})")]
    InvalidRange { column: String, count: usize },

    #[error("invalid date-time format for {column}")]
    InvalidTimestamp { column: String },

    #[error("order not asc or desc for {column}: {direction}")]
    InvalidSortDirection { column: String, direction: String },
}

/// Every error recorded on a query, in the order they occurred.
///
/// Returned by [`SelectQuery::build`](super::SelectQuery::build) when the
/// query must not be executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_messages(.0))]
pub struct QueryErrors(pub Vec<FilterError>);

impl QueryErrors {
    pub fn errors(&self) -> &[FilterError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_messages(errors: &[FilterError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
