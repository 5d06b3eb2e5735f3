//! Release listing queries over the `releases_fts` search index.

use super::pagination::{compute_pagination, Pagination, PaginationSettings};
use crate::catalog_store::{
    ArtistDetail, CatalogCounts, CatalogError, CatalogResult, CatalogStore, QueryParam,
    ReleaseDetail, ReleaseListing,
};
use axum::http::Uri;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

const COUNT_ALL_SQL: &str = "SELECT COUNT(*) FROM releases_fts";

const COUNT_SEARCH_SQL: &str = "SELECT COUNT(*) FROM releases_fts WHERE releases_fts MATCH ?1";

const PAGE_ALL_SQL: &str = "SELECT
        CAST(release_id AS INTEGER),
        release_name,
        CAST(release_year AS INTEGER),
        artist_name
    FROM releases_fts
    ORDER BY CAST(release_year AS INTEGER) ASC, CAST(release_id AS INTEGER) ASC
    LIMIT ?1 OFFSET ?2";

const PAGE_SEARCH_SQL: &str = "SELECT
        CAST(release_id AS INTEGER),
        release_name,
        CAST(release_year AS INTEGER),
        artist_name
    FROM releases_fts
    WHERE releases_fts MATCH ?1
    ORDER BY CAST(release_year AS INTEGER) ASC, CAST(release_id AS INTEGER) ASC
    LIMIT ?2 OFFSET ?3";

/// Which releases a listing covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseFilter {
    All,
    /// Full-text match on a non-empty, trimmed term.
    Search(String),
}

impl ReleaseFilter {
    pub fn from_search_term(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(term) if !term.is_empty() => ReleaseFilter::Search(term.to_string()),
            _ => ReleaseFilter::All,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        match self {
            ReleaseFilter::All => None,
            ReleaseFilter::Search(term) => Some(term),
        }
    }
}

/// Wraps a term as a single FTS5 phrase so operators in user input are not
/// interpreted.
fn fts5_phrase(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedQuery {
    pub sql: &'static str,
    pub params: Vec<QueryParam>,
}

pub fn count_query(filter: &ReleaseFilter) -> ComposedQuery {
    match filter {
        ReleaseFilter::All => ComposedQuery {
            sql: COUNT_ALL_SQL,
            params: vec![],
        },
        ReleaseFilter::Search(term) => ComposedQuery {
            sql: COUNT_SEARCH_SQL,
            params: vec![QueryParam::Text(fts5_phrase(term))],
        },
    }
}

pub fn page_query(limit: i64, offset: i64, filter: &ReleaseFilter) -> CatalogResult<ComposedQuery> {
    if limit <= 0 {
        return Err(CatalogError::InvalidParameter(format!(
            "limit must be positive, got {}",
            limit
        )));
    }
    if offset < 0 {
        return Err(CatalogError::InvalidParameter(format!(
            "offset must not be negative, got {}",
            offset
        )));
    }

    Ok(match filter {
        ReleaseFilter::All => ComposedQuery {
            sql: PAGE_ALL_SQL,
            params: vec![QueryParam::Integer(limit), QueryParam::Integer(offset)],
        },
        ReleaseFilter::Search(term) => ComposedQuery {
            sql: PAGE_SEARCH_SQL,
            params: vec![
                QueryParam::Text(fts5_phrase(term)),
                QueryParam::Integer(limit),
                QueryParam::Integer(offset),
            ],
        },
    })
}

/// Raw listing parameters as they arrive on the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReleaseListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub q: Option<String>,
}

impl ReleaseListParams {
    /// Reads `page`, `page_size` and `q` from a raw query string. When a key
    /// repeats, the first value wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = ReleaseListParams::default();
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "page" => &mut params.page,
                "page_size" => &mut params.page_size,
                "q" => &mut params.q,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReleasePage {
    pub releases: Vec<ReleaseListing>,
    pub pagination: Pagination,
    #[serde(skip)]
    pub filter: ReleaseFilter,
}

/// Runs release listing queries on the blocking pool, each bounded by
/// `query_timeout`.
#[derive(Clone)]
pub struct ReleaseQueryComposer {
    store: Arc<dyn CatalogStore>,
    query_timeout: Duration,
}

impl ReleaseQueryComposer {
    pub fn new(store: Arc<dyn CatalogStore>, query_timeout: Duration) -> Self {
        ReleaseQueryComposer {
            store,
            query_timeout,
        }
    }

    async fn run_blocking<T, F>(&self, f: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CatalogStore) -> CatalogResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || f(store.as_ref()));
        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(CatalogError::query("Query task failed", join_error)),
            Err(_) => {
                warn!("Query exceeded deadline of {:?}", self.query_timeout);
                Err(CatalogError::DeadlineExceeded(self.query_timeout))
            }
        }
    }

    pub async fn count(&self, filter: &ReleaseFilter) -> CatalogResult<i64> {
        let query = count_query(filter);
        self.run_blocking(move |store| store.query_scalar(query.sql, &query.params))
            .await
    }

    pub async fn fetch_page(
        &self,
        limit: i64,
        offset: i64,
        filter: &ReleaseFilter,
    ) -> CatalogResult<Vec<ReleaseListing>> {
        let query = page_query(limit, offset, filter)?;
        self.run_blocking(move |store| store.query_release_listings(query.sql, &query.params))
            .await
    }

    /// Counts the matching releases, normalizes the requested page against
    /// that count and fetches it.
    pub async fn paginated_releases(
        &self,
        params: &ReleaseListParams,
        current_url: &Uri,
        settings: &PaginationSettings,
    ) -> CatalogResult<ReleasePage> {
        let filter = ReleaseFilter::from_search_term(params.q.as_deref());
        let total_count = self.count(&filter).await?;
        let pagination = compute_pagination(
            params.page.as_deref(),
            params.page_size.as_deref(),
            total_count,
            current_url,
            settings,
        )?;
        let releases = self
            .fetch_page(pagination.limit, pagination.offset, &filter)
            .await?;
        debug!(
            "Listing {:?}: {} of {} releases on page {}",
            filter,
            releases.len(),
            total_count,
            pagination.page
        );

        Ok(ReleasePage {
            releases,
            pagination,
            filter,
        })
    }

    pub async fn artist_detail(&self, id: i64) -> CatalogResult<ArtistDetail> {
        self.run_blocking(move |store| store.get_artist(id))
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "artist",
                id,
            })
    }

    pub async fn release_detail(&self, id: i64) -> CatalogResult<ReleaseDetail> {
        self.run_blocking(move |store| store.get_release(id))
            .await?
            .ok_or(CatalogError::NotFound {
                entity: "release",
                id,
            })
    }

    pub async fn counts(&self) -> CatalogResult<CatalogCounts> {
        self.run_blocking(|store| store.get_counts()).await
    }
}
