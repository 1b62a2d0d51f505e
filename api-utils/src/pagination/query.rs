//! Select query builder
//!
//! `SelectQuery` collects WHERE predicates, OR groups, ORDER BY clauses and
//! filter errors for a base `SELECT` statement. It is passed by value through
//! each filter step, and `build` refuses to produce SQL once any error has
//! been recorded.
//!
//! Predicates keep their bind values next to the SQL fragments, so
//! placeholders are numbered (`$1`, `$2`, ...) only when the final statement
//! is rendered.

use chrono::{DateTime, Utc};
use sqlx::Postgres;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};

use super::error::{FilterError, QueryErrors};

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    /// `None` binds SQL `NULL`
    Timestamp(Option<DateTime<Utc>>),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Sql(String),
    Bind(BindValue),
}

/// A SQL fragment with inline bind values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    parts: Vec<Part>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw SQL. Never pass user input here.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.parts.push(Part::Sql(sql.into()));
        self
    }

    /// Append a placeholder bound to `value`
    pub fn bind(mut self, value: BindValue) -> Self {
        self.parts.push(Part::Bind(value));
        self
    }

    /// Append `(p1, p2, ...)` with one placeholder per value
    pub fn bind_list(mut self, values: impl IntoIterator<Item = BindValue>) -> Self {
        self.parts.push(Part::Sql("(".to_string()));
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.parts.push(Part::Sql(", ".to_string()));
            }
            self.parts.push(Part::Bind(value));
        }
        self.parts.push(Part::Sql(")".to_string()));
        self
    }

    fn render(&self, sql: &mut String, binds: &mut Vec<BindValue>) {
        for part in &self.parts {
            match part {
                Part::Sql(s) => sql.push_str(s),
                Part::Bind(value) => {
                    binds.push(value.clone());
                    sql.push('$');
                    sql.push_str(&binds.len().to_string());
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Where(Predicate),
    AnyOf(Vec<Predicate>),
}

impl Condition {
    fn render(&self, sql: &mut String, binds: &mut Vec<BindValue>) {
        match self {
            Self::Where(predicate) => predicate.render(sql, binds),
            Self::AnyOf(predicates) => {
                sql.push('(');
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" OR ");
                    }
                    predicate.render(sql, binds);
                }
                sql.push(')');
            }
        }
    }
}

/// Query builder for a base `SELECT` statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    base: String,
    conditions: Vec<Condition>,
    orderings: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    errors: Vec<FilterError>,
}

impl SelectQuery {
    /// Start from a base statement such as `SELECT id, name FROM users`.
    /// The base must not contain its own WHERE, ORDER BY or LIMIT.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
            errors: Vec::new(),
        }
    }

    /// AND a predicate onto the WHERE clause
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.conditions.push(Condition::Where(predicate));
        self
    }

    /// AND a parenthesized OR group onto the WHERE clause.
    /// An empty group is ignored.
    pub fn or_group(mut self, predicates: Vec<Predicate>) -> Self {
        if !predicates.is_empty() {
            self.conditions.push(Condition::AnyOf(predicates));
        }
        self
    }

    /// Append an ORDER BY entry, e.g. `"name" ASC`
    pub fn order_by(mut self, ordering: impl Into<String>) -> Self {
        self.orderings.push(ordering.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Record a non-fatal error; building continues
    pub fn add_error(mut self, error: FilterError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn add_errors(mut self, errors: impl IntoIterator<Item = FilterError>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Apply a query transformation such as [`filter`](super::filter) or
    /// [`sort`](super::sort)
    pub fn apply<F>(self, transform: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        transform(self)
    }

    pub fn errors(&self) -> &[FilterError] {
        &self.errors
    }

    pub fn orderings(&self) -> &[String] {
        &self.orderings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render the full statement: WHERE, ORDER BY, LIMIT and OFFSET
    pub fn build(&self) -> Result<BuiltQuery, QueryErrors> {
        self.check()?;

        let mut sql = self.base.clone();
        let mut binds = Vec::new();
        self.render_where(&mut sql, &mut binds);

        if !self.orderings.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orderings.join(", "));
        }
        if let Some(limit) = self.limit {
            binds.push(BindValue::Int(limit));
            sql.push_str(&format!(" LIMIT ${}", binds.len()));
        }
        if let Some(offset) = self.offset {
            binds.push(BindValue::Int(offset));
            sql.push_str(&format!(" OFFSET ${}", binds.len()));
        }

        Ok(BuiltQuery { sql, binds })
    }

    /// Render `SELECT COUNT(*)` over the filtered base statement, ignoring
    /// ordering and paging
    pub fn build_count(&self) -> Result<BuiltQuery, QueryErrors> {
        self.check()?;

        let mut inner = self.base.clone();
        let mut binds = Vec::new();
        self.render_where(&mut inner, &mut binds);

        Ok(BuiltQuery {
            sql: format!("SELECT COUNT(*) FROM ({}) AS filtered", inner),
            binds,
        })
    }

    fn check(&self) -> Result<(), QueryErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(QueryErrors(self.errors.clone()))
        }
    }

    fn render_where(&self, sql: &mut String, binds: &mut Vec<BindValue>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            condition.render(sql, binds);
        }
    }
}

/// A rendered statement and its binds, ready for sqlx
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Bind every value in order; shared by the three sqlx query flavours
macro_rules! bind_all {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        for value in $binds {
            query = match value {
                BindValue::Text(s) => query.bind(s.as_str()),
                BindValue::Timestamp(ts) => query.bind(*ts),
                BindValue::Int(n) => query.bind(*n),
            };
        }
        query
    }};
}

impl BuiltQuery {
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        bind_all!(sqlx::query(&self.sql), &self.binds)
    }

    pub fn query_as<O>(&self) -> QueryAs<'_, Postgres, O, PgArguments>
    where
        O: for<'r> sqlx::FromRow<'r, PgRow>,
    {
        bind_all!(sqlx::query_as::<_, O>(&self.sql), &self.binds)
    }

    /// Typically used with [`SelectQuery::build_count`] and `O = i64`
    pub fn query_scalar<O>(&self) -> QueryScalar<'_, Postgres, O, PgArguments>
    where
        (O,): for<'r> sqlx::FromRow<'r, PgRow>,
    {
        bind_all!(sqlx::query_scalar::<_, O>(&self.sql), &self.binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(column: &str, value: &str) -> Predicate {
        Predicate::new()
            .sql(format!("{} = ", column))
            .bind(BindValue::Text(value.to_string()))
    }

    #[test]
    fn test_build_without_conditions() {
        let built = SelectQuery::new("SELECT * FROM users").build().unwrap();
        assert_eq!(built.sql, "SELECT * FROM users");
        assert!(built.binds.is_empty());
    }

    #[test]
    fn test_build_numbers_placeholders_in_order() {
        let built = SelectQuery::new("SELECT * FROM users")
            .and_where(eq("a", "1"))
            .or_group(vec![eq("b", "2"), eq("c", "3")])
            .order_by("\"a\" ASC")
            .order_by("\"b\" DESC")
            .limit(10)
            .offset(20)
            .build()
            .unwrap();

        assert_eq!(
            built.sql,
            "SELECT * FROM users WHERE a = $1 AND (b = $2 OR c = $3) \
             ORDER BY \"a\" ASC, \"b\" DESC LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            built.binds,
            vec![
                BindValue::Text("1".to_string()),
                BindValue::Text("2".to_string()),
                BindValue::Text("3".to_string()),
                BindValue::Int(10),
                BindValue::Int(20),
            ]
        );
    }

    #[test]
    fn test_bind_list() {
        let predicate = Predicate::new().sql("x IN ").bind_list(vec![
            BindValue::Text("a".to_string()),
            BindValue::Text("b".to_string()),
        ]);
        let built = SelectQuery::new("SELECT * FROM t")
            .and_where(predicate)
            .build()
            .unwrap();
        assert_eq!(built.sql, "SELECT * FROM t WHERE x IN ($1, $2)");
    }

    #[test]
    fn test_empty_or_group_is_ignored() {
        let built = SelectQuery::new("SELECT * FROM t")
            .or_group(Vec::new())
            .build()
            .unwrap();
        assert_eq!(built.sql, "SELECT * FROM t");
    }

    #[test]
    fn test_build_fails_with_errors() {
        let query = SelectQuery::new("SELECT * FROM t")
            .and_where(eq("a", "1"))
            .add_error(FilterError::ColumnNotAllowed {
                column: "x".to_string(),
            });
        assert!(query.has_errors());

        let errors = query.build().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(query.build_count().is_err());
    }

    #[test]
    fn test_build_count_ignores_paging_and_order() {
        let built = SelectQuery::new("SELECT id FROM t")
            .and_where(eq("a", "1"))
            .order_by("\"id\" DESC")
            .limit(5)
            .offset(5)
            .build_count()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT COUNT(*) FROM (SELECT id FROM t WHERE a = $1) AS filtered"
        );
        assert_eq!(built.binds.len(), 1);
    }

    #[test]
    fn test_apply_composes() {
        let query = SelectQuery::new("SELECT * FROM t")
            .apply(|q| q.and_where(eq("a", "1")))
            .apply(|q| q.order_by("\"a\" ASC"));
        let built = query.build().unwrap();
        assert_eq!(built.sql, "SELECT * FROM t WHERE a = $1 ORDER BY \"a\" ASC");
    }

    #[test]
    fn test_every_bind_reaches_sqlx() {
        use sqlx::{Arguments, Execute};

        let built = SelectQuery::new("SELECT * FROM t")
            .and_where(eq("a", "1"))
            .and_where(
                Predicate::new()
                    .sql("b BETWEEN ")
                    .bind(BindValue::Timestamp(None))
                    .sql(" AND ")
                    .bind(BindValue::Int(7)),
            )
            .build()
            .unwrap();

        let mut query = built.query();
        assert_eq!(query.sql(), built.sql);
        let args = query.take_arguments().unwrap().unwrap();
        assert_eq!(args.len(), 3);

        let mut scalar = built.query_scalar::<i64>();
        assert_eq!(scalar.take_arguments().unwrap().unwrap().len(), 3);
    }
}
