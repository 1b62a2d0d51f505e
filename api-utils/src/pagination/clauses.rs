//! Clause builders, one per filter operator
//!
//! Each builder tokenizes its raw parameter, records tokenizer errors on the
//! query, and appends one predicate (or ordering) per accepted column.
//! Values are always bound, never interpolated; columns go through
//! [`parse_column`].

use chrono::{DateTime, Utc};

use super::column::parse_column;
use super::error::FilterError;
use super::query::{BindValue, Predicate, SelectQuery};
use super::tokenizer::{parse_multi_value_params, parse_single_value_params};

/// `"col"::text = $n`
///
/// The column is compared as text so filters work on non-string columns.
fn eq_predicate(column: &str, value: &str) -> Predicate {
    Predicate::new()
        .sql(format!("{}::text = ", parse_column(column)))
        .bind(BindValue::Text(value.to_string()))
}

/// `"col"::text ILIKE $n` bound to `%value%`
fn like_predicate(column: &str, value: &str) -> Predicate {
    Predicate::new()
        .sql(format!("{}::text ILIKE ", parse_column(column)))
        .bind(BindValue::Text(format!("%{}%", value)))
}

/// `searchLike=firstname:john,lastname:doe`
pub fn search_like(query: SelectQuery, params: &str, allowed_columns: &[&str]) -> SelectQuery {
    let parsed = parse_single_value_params(params, allowed_columns);
    let mut query = query.add_errors(parsed.errors);
    for (column, value) in &parsed.values {
        query = query.and_where(like_predicate(column, value));
    }
    query
}

/// `searchEq=firstname:john,lastname:doe`
pub fn search_eq(query: SelectQuery, params: &str, allowed_columns: &[&str]) -> SelectQuery {
    let parsed = parse_single_value_params(params, allowed_columns);
    let mut query = query.add_errors(parsed.errors);
    for (column, value) in &parsed.values {
        query = query.and_where(eq_predicate(column, value));
    }
    query
}

/// `searchEqOr=status:open` + `searchLikeOr=title:bug`
///
/// Both parameters feed a single OR group, AND-ed with the rest of the
/// filter: `("status"::text = $1 OR "title"::text ILIKE $2)`.
pub fn search_or(
    query: SelectQuery,
    eq_params: &str,
    like_params: &str,
    allowed_columns: &[&str],
) -> SelectQuery {
    let eq = parse_single_value_params(eq_params, allowed_columns);
    let like = parse_single_value_params(like_params, allowed_columns);

    let predicates = eq
        .values
        .iter()
        .map(|(column, value)| eq_predicate(column, value))
        .chain(
            like.values
                .iter()
                .map(|(column, value)| like_predicate(column, value)),
        )
        .collect();

    query
        .add_errors(eq.errors)
        .add_errors(like.errors)
        .or_group(predicates)
}

/// `searchIn=status:open;closed`
pub fn search_in(query: SelectQuery, params: &str, allowed_columns: &[&str]) -> SelectQuery {
    let parsed = parse_multi_value_params(params, allowed_columns);
    let mut query = query.add_errors(parsed.errors);
    for (column, values) in &parsed.values {
        let predicate = Predicate::new()
            .sql(format!("{}::text IN ", parse_column(column)))
            .bind_list(values.iter().cloned().map(BindValue::Text));
        query = query.and_where(predicate);
    }
    query
}

/// `searchBetween=created_at:2020-08-03T00:00:00Z;2020-09-03T00:00:00Z`
///
/// The value count and each timestamp are checked independently, so one
/// clause can record both an `InvalidRange` and an `InvalidTimestamp`. The
/// predicate is bound either way (missing or bad sides bind `NULL`); the
/// recorded errors keep the query from being built.
pub fn search_between(query: SelectQuery, params: &str, allowed_columns: &[&str]) -> SelectQuery {
    let parsed = parse_multi_value_params(params, allowed_columns);
    let mut query = query.add_errors(parsed.errors);

    for (column, values) in &parsed.values {
        if values.len() != 2 {
            query = query.add_error(FilterError::InvalidRange {
                column: column.clone(),
                count: values.len(),
            });
        }

        let start = values.first().and_then(|v| parse_rfc3339(v));
        let end = values.get(1).and_then(|v| parse_rfc3339(v));
        if start.is_none() || end.is_none() {
            query = query.add_error(FilterError::InvalidTimestamp {
                column: column.clone(),
            });
        }

        let predicate = Predicate::new()
            .sql(format!("{} BETWEEN ", parse_column(column)))
            .bind(BindValue::Timestamp(start))
            .sql(" AND ")
            .bind(BindValue::Timestamp(end));
        query = query.and_where(predicate);
    }
    query
}

/// `sortBy=firstname:asc,lastname:desc`
pub fn sort_by(query: SelectQuery, params: &str, allowed_columns: &[&str]) -> SelectQuery {
    let parsed = parse_single_value_params(params, allowed_columns);
    let mut query = query.add_errors(parsed.errors);

    for (column, direction) in parsed.values {
        let keyword = match direction.as_str() {
            "asc" => Some("ASC"),
            "desc" => Some("DESC"),
            _ => None,
        };
        query = match keyword {
            Some(keyword) => query.order_by(format!("{} {}", parse_column(&column), keyword)),
            None => query.add_error(FilterError::InvalidSortDirection { column, direction }),
        };
    }
    query
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn base() -> SelectQuery {
        SelectQuery::new("SELECT * FROM users")
    }

    fn text(s: &str) -> BindValue {
        BindValue::Text(s.to_string())
    }

    #[test]
    fn test_search_eq_casts_to_text() {
        let built = search_eq(base(), "active:true", &["active"])
            .build()
            .unwrap();
        assert_eq!(built.sql, "SELECT * FROM users WHERE \"active\"::text = $1");
        assert_eq!(built.binds, vec![text("true")]);
    }

    #[test]
    fn test_search_like_wraps_value() {
        let built = search_like(base(), "firstname:jo,lastname:doe", &["firstname", "lastname"])
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE \"firstname\"::text ILIKE $1 \
             AND \"lastname\"::text ILIKE $2"
        );
        assert_eq!(built.binds, vec![text("%jo%"), text("%doe%")]);
    }

    #[test]
    fn test_search_like_quotes_qualified_columns() {
        let built = search_like(base(), "u.name:x", &["u.name"]).build().unwrap();
        assert_eq!(built.sql, "SELECT * FROM users WHERE \"u\".\"name\"::text ILIKE $1");
    }

    #[test]
    fn test_search_or_merges_eq_and_like() {
        let built = search_or(base(), "status:open", "title:bug", &["status", "title"])
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE (\"status\"::text = $1 OR \"title\"::text ILIKE $2)"
        );
        assert_eq!(built.binds, vec![text("open"), text("%bug%")]);
    }

    #[test]
    fn test_search_or_empty_adds_nothing() {
        let built = search_or(base(), "", "", &["status"]).build().unwrap();
        assert_eq!(built.sql, "SELECT * FROM users");
    }

    #[test]
    fn test_search_or_collects_errors_from_both_params() {
        let query = search_or(base(), "x:1", "y:2", &["status"]);
        assert_eq!(query.errors().len(), 2);
    }

    #[test]
    fn test_search_in_binds_each_value() {
        let built = search_in(base(), "status:open;closed", &["status"])
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE \"status\"::text IN ($1, $2)"
        );
        assert_eq!(built.binds, vec![text("open"), text("closed")]);
    }

    #[test]
    fn test_search_in_casts_non_text_columns() {
        let built = search_in(base(), "is_online:true;false", &["is_online"])
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE \"is_online\"::text IN ($1, $2)"
        );
        assert_eq!(built.binds, vec![text("true"), text("false")]);
    }

    #[test]
    fn test_search_between_valid() {
        let query = search_between(
            base(),
            "created_at:2020-08-03T00:00:00Z;2020-09-03T00:00:00Z",
            &["created_at"],
        );
        assert!(query.errors().is_empty());

        let built = query.build().unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE \"created_at\" BETWEEN $1 AND $2"
        );
        assert_eq!(
            built.binds,
            vec![
                BindValue::Timestamp(Some(Utc.with_ymd_and_hms(2020, 8, 3, 0, 0, 0).unwrap())),
                BindValue::Timestamp(Some(Utc.with_ymd_and_hms(2020, 9, 3, 0, 0, 0).unwrap())),
            ]
        );
    }

    #[test]
    fn test_search_between_converts_offsets_to_utc() {
        let built = search_between(
            base(),
            "created_at:2020-08-03T02:00:00+02:00;2020-08-04T00:00:00Z",
            &["created_at"],
        )
        .build()
        .unwrap();
        assert_eq!(
            built.binds[0],
            BindValue::Timestamp(Some(Utc.with_ymd_and_hms(2020, 8, 3, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_search_between_single_value_reports_both_errors() {
        let query = search_between(base(), "created_at:onlyone", &["created_at"]);
        let range_errors = query
            .errors()
            .iter()
            .filter(|e| matches!(e, FilterError::InvalidRange { .. }))
            .count();
        let timestamp_errors = query
            .errors()
            .iter()
            .filter(|e| matches!(e, FilterError::InvalidTimestamp { .. }))
            .count();
        assert_eq!(range_errors, 1);
        assert_eq!(timestamp_errors, 1);
        assert!(query.build().is_err());
    }

    #[test]
    fn test_search_between_bad_timestamp_only() {
        let query = search_between(
            base(),
            "created_at:2020-08-03;2020-09-03T00:00:00Z",
            &["created_at"],
        );
        assert_eq!(
            query.errors(),
            &[FilterError::InvalidTimestamp {
                column: "created_at".to_string()
            }]
        );
    }

    #[test]
    fn test_search_between_three_values() {
        let query = search_between(
            base(),
            "created_at:2020-08-03T00:00:00Z;2020-09-03T00:00:00Z;2020-10-03T00:00:00Z",
            &["created_at"],
        );
        assert_eq!(
            query.errors(),
            &[FilterError::InvalidRange {
                column: "created_at".to_string(),
                count: 3
            }]
        );
    }

    #[test]
    fn test_sort_by_asc_and_desc() {
        let query = sort_by(base(), "name:asc,age:desc", &["name", "age"]);
        assert!(query.errors().is_empty());

        let built = query.build().unwrap();
        assert_eq!(
            built.sql,
            "SELECT * FROM users ORDER BY \"age\" DESC, \"name\" ASC"
        );
    }

    #[test]
    fn test_sort_by_invalid_direction() {
        let query = sort_by(base(), "name:upward", &["name"]);
        assert_eq!(
            query.errors(),
            &[FilterError::InvalidSortDirection {
                column: "name".to_string(),
                direction: "upward".to_string()
            }]
        );

        assert!(query.orderings().is_empty());
    }

    #[test]
    fn test_sort_by_skips_only_the_bad_clause() {
        let query = sort_by(base(), "name:upward,age:asc", &["name", "age"]);
        assert_eq!(query.errors().len(), 1);
        assert_eq!(query.orderings(), &["\"age\" ASC".to_string()]);
    }

    #[test]
    fn test_sort_by_direction_is_case_sensitive() {
        let query = sort_by(base(), "name:ASC", &["name"]);
        assert_eq!(query.errors().len(), 1);
    }
}
