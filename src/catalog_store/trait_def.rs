//! CatalogStore trait definition.
//!
//! The store executes SQL composed elsewhere and maps the rows to fixed
//! record types. It does not decide which query to run for a request.

use super::error::CatalogResult;
use super::models::{ArtistDetail, CatalogCounts, ReleaseDetail, ReleaseListing};
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;

/// A positional SQL parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Integer(i64),
}

impl ToSql for QueryParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            QueryParam::Text(value) => value.to_sql(),
            QueryParam::Integer(value) => value.to_sql(),
        }
    }
}

pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Query Execution
    // =========================================================================

    /// Runs a query returning a single integer, e.g. a `COUNT(*)`.
    fn query_scalar(&self, sql: &str, params: &[QueryParam]) -> CatalogResult<i64>;

    /// Runs a query whose columns are, in order, release id, release title,
    /// release year and artist name.
    fn query_release_listings(
        &self,
        sql: &str,
        params: &[QueryParam],
    ) -> CatalogResult<Vec<ReleaseListing>>;

    // =========================================================================
    // Entity Lookups
    // =========================================================================

    fn get_artist(&self, id: i64) -> CatalogResult<Option<ArtistDetail>>;

    fn get_release(&self, id: i64) -> CatalogResult<Option<ReleaseDetail>>;

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Repopulates the search index from the base tables, returning the number
    /// of indexed rows.
    fn rebuild_search_index(&self) -> CatalogResult<usize>;

    fn get_counts(&self) -> CatalogResult<CatalogCounts>;
}
