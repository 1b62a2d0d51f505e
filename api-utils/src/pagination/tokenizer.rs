//! Filter parameter tokenizing
//!
//! Raw parameters look like `column:value,column:value` (single value) or
//! `column:v1;v2;v3,column:v1` (multi value). Each clause is checked for
//! shape and against the endpoint's allowed columns.

use std::collections::BTreeMap;

use super::error::FilterError;

/// Separator between clauses
const CLAUSE_SEPARATOR: char = ',';

/// Separator between a column and its value
const KEY_SEPARATOR: char = ':';

/// Separator between values of a multi value clause
const VALUE_SEPARATOR: char = ';';

/// Result of tokenizing one raw parameter
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// Accepted clauses keyed by column. A repeated column keeps its last value.
    pub values: BTreeMap<String, T>,
    /// Rejected clauses, in input order
    pub errors: Vec<FilterError>,
}

/// Parse `column:value,column:value`.
///
/// A clause must split on `:` into exactly two parts, so values containing
/// `:` are rejected as malformed.
pub fn parse_single_value_params(params: &str, allowed_columns: &[&str]) -> Parsed<String> {
    parse_params(params, allowed_columns, |clause| {
        let parts: Vec<&str> = clause.split(KEY_SEPARATOR).collect();
        match parts.as_slice() {
            [key, value] => Some((*key, *value)),
            _ => None,
        }
    })
    .map_values(str::to_string)
}

/// Parse `column:v1;v2,column:v1`.
///
/// Only the first `:` separates the column from its values, which keeps
/// timestamps like `2020-08-03T00:00:00Z` intact.
pub fn parse_multi_value_params(params: &str, allowed_columns: &[&str]) -> Parsed<Vec<String>> {
    parse_params(params, allowed_columns, |clause| {
        clause.split_once(KEY_SEPARATOR)
    })
    .map_values(|rest| rest.split(VALUE_SEPARATOR).map(str::to_string).collect())
}

fn parse_params<'a, F>(params: &'a str, allowed_columns: &[&str], split: F) -> Parsed<&'a str>
where
    F: Fn(&'a str) -> Option<(&'a str, &'a str)>,
{
    let mut parsed = Parsed::default();
    if params.is_empty() {
        return parsed;
    }

    for clause in params.split(CLAUSE_SEPARATOR) {
        let Some((key, value)) = split(clause).filter(|(key, _)| !key.is_empty()) else {
            tracing::debug!(clause, "Rejected malformed filter clause");
            parsed.errors.push(FilterError::MalformedClause {
                clause: clause.to_string(),
            });
            continue;
        };

        // Missing value means "no filter", not bad input
        if value.is_empty() {
            continue;
        }

        if !allowed_columns.contains(&key) {
            tracing::debug!(column = key, "Rejected filter on disallowed column");
            parsed.errors.push(FilterError::ColumnNotAllowed {
                column: key.to_string(),
            });
            continue;
        }

        parsed.values.insert(key.to_string(), value);
    }

    parsed
}

impl<'a> Parsed<&'a str> {
    fn map_values<T, F>(self, f: F) -> Parsed<T>
    where
        F: Fn(&'a str) -> T,
    {
        Parsed {
            values: self.values.into_iter().map(|(k, v)| (k, f(v))).collect(),
            errors: self.errors,
        }
    }
}
