//! Filter request parameters

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const SEARCH_LIKE: &str = "searchLike";
pub const SEARCH_EQ: &str = "searchEq";
pub const SEARCH_LIKE_OR: &str = "searchLikeOr";
pub const SEARCH_EQ_OR: &str = "searchEqOr";
pub const SEARCH_IN: &str = "searchIn";
pub const SEARCH_BETWEEN: &str = "searchBetween";
pub const SORT_BY: &str = "sortBy";

/// Raw filter parameters of one request.
///
/// Absent parameters are empty strings, which every clause builder treats
/// as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub search_like: String,
    pub search_eq: String,
    pub search_like_or: String,
    pub search_eq_or: String,
    pub search_in: String,
    pub search_between: String,
    pub sort_by: String,
}

impl FilterRequest {
    /// Build from decoded query pairs. The first occurrence of a repeated
    /// name wins; unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Self::default();
        let mut seen: Vec<&'static str> = Vec::new();

        for (name, value) in pairs {
            let Some((key, slot)) = request.slot(name.as_ref()) else {
                continue;
            };
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            *slot = value.into();
        }
        request
    }

    /// Build from a raw (still percent-encoded) query string
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    fn slot(&mut self, name: &str) -> Option<(&'static str, &mut String)> {
        let entry = match name {
            SEARCH_LIKE => (SEARCH_LIKE, &mut self.search_like),
            SEARCH_EQ => (SEARCH_EQ, &mut self.search_eq),
            SEARCH_LIKE_OR => (SEARCH_LIKE_OR, &mut self.search_like_or),
            SEARCH_EQ_OR => (SEARCH_EQ_OR, &mut self.search_eq_or),
            SEARCH_IN => (SEARCH_IN, &mut self.search_in),
            SEARCH_BETWEEN => (SEARCH_BETWEEN, &mut self.search_between),
            SORT_BY => (SORT_BY, &mut self.sort_by),
            _ => return None,
        };
        Some(entry)
    }
}

impl<S> FromRequestParts<S> for FilterRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query().unwrap_or_default()))
    }
}
