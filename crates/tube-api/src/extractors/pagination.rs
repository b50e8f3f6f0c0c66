//! Pagination extractor
//!
//! Extracts cursor-based pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tube_core::{PageQuery, Snowflake};

use crate::response::ApiError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validated pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Items older than this id
    pub before: Option<Snowflake>,
    /// Items newer than this id
    pub after: Option<Snowflake>,
    /// Page size, clamped to 1-100
    pub limit: i64,
}

impl Pagination {
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.before, self.after, self.limit)
    }
}

fn parse_cursor(raw: Option<String>, name: &str) -> Result<Option<Snowflake>, ApiError> {
    raw.map(|s| {
        s.parse::<Snowflake>()
            .map_err(|_| ApiError::invalid_query(format!("Invalid '{name}' cursor format")))
    })
    .transpose()
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        Ok(Pagination {
            before: parse_cursor(params.before, "before")?,
            after: parse_cursor(params.after, "after")?,
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Pagination::try_from(params)
    }
}
