//! Filtering, sorting and paging for list endpoints
//!
//! A request carries filter expressions such as
//! `searchEq=status:open,owner:42` or `sortBy=created_at:desc`. Every column
//! named in an expression must be in the endpoint's allow-list; clauses that
//! fail are recorded on the [`SelectQuery`] and make [`SelectQuery::build`]
//! fail, so a partly invalid request is never executed.
//!
//! ```ignore
//! const COLUMNS: &[&str] = &["name", "status", "created_at"];
//!
//! let query = SelectQuery::new("SELECT id, name FROM users")
//!     .apply(filter(&request, COLUMNS))
//!     .apply(sort(&request, COLUMNS));
//! let total: i64 = query.build_count()?.query_scalar().fetch_one(pool).await?;
//! let rows: Vec<User> = query
//!     .limit(page.limit())
//!     .offset(page.offset())
//!     .build()?
//!     .query_as()
//!     .fetch_all(pool)
//!     .await?;
//! let body = PaginationModel::from_page(&page, total, rows);
//! ```

mod clauses;
mod column;
mod error;
mod model;
mod query;
mod request;
mod tokenizer;

pub use clauses::{search_between, search_eq, search_in, search_like, search_or, sort_by};
pub use column::parse_column;
pub use error::{FilterError, QueryErrors};
pub use model::{
    DEFAULT_LIMIT, DEFAULT_PAGE, MAX_PAGE_LIMIT, PageParams, PaginationModel, offset, page_count,
    validate_limit, validate_page,
};
pub use query::{BindValue, BuiltQuery, Predicate, SelectQuery};
pub use request::{
    FilterRequest, SEARCH_BETWEEN, SEARCH_EQ, SEARCH_EQ_OR, SEARCH_IN, SEARCH_LIKE,
    SEARCH_LIKE_OR, SORT_BY,
};
pub use tokenizer::{Parsed, parse_multi_value_params, parse_single_value_params};

/// All filter operators of `request`, in order: like, eq, the OR group,
/// in, between
pub fn filter<'a>(
    request: &'a FilterRequest,
    allowed_columns: &'a [&'a str],
) -> impl FnOnce(SelectQuery) -> SelectQuery + 'a {
    move |query| {
        let query = search_like(query, &request.search_like, allowed_columns);
        let query = search_eq(query, &request.search_eq, allowed_columns);
        let query = search_or(
            query,
            &request.search_eq_or,
            &request.search_like_or,
            allowed_columns,
        );
        let query = search_in(query, &request.search_in, allowed_columns);
        search_between(query, &request.search_between, allowed_columns)
    }
}

/// The `sortBy` parameter of `request`
pub fn sort<'a>(
    request: &'a FilterRequest,
    allowed_columns: &'a [&'a str],
) -> impl FnOnce(SelectQuery) -> SelectQuery + 'a {
    move |query| sort_by(query, &request.sort_by, allowed_columns)
}

/// Shorthand for [`PaginationModel::new`]
pub fn create_pagination_model<T>(
    limit: i64,
    page: i64,
    page_count: i64,
    total: i64,
    result: T,
) -> PaginationModel<T> {
    PaginationModel::new(limit, page, page_count, total, result)
}
