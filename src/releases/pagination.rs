//! Page/limit normalization and next/prev link generation for listings.

use crate::catalog_store::{CatalogError, CatalogResult};
use axum::http::Uri;
use serde::Serialize;
use std::collections::BTreeMap;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const PAGE_PARAM: &str = "page";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_page_size: i64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Normalized pagination state for one listing response.
///
/// `first` and `last` are 1-based positions of the rows shown on this page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub first: i64,
    pub last: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_url: Option<String>,
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::parse::<i64>) {
        Some(Ok(value)) if value >= 1 => value,
        _ => default,
    }
}

/// Computes the pagination descriptor for a listing of `total_count` rows.
///
/// Malformed or non-positive `page_param`/`limit_param` fall back to page 1
/// and the configured default page size. Out-of-range pages are clamped.
pub fn compute_pagination(
    page_param: Option<&str>,
    limit_param: Option<&str>,
    total_count: i64,
    current_url: &Uri,
    settings: &PaginationSettings,
) -> CatalogResult<Pagination> {
    if total_count < 0 {
        return Err(CatalogError::InvalidParameter(format!(
            "total count must not be negative, got {}",
            total_count
        )));
    }

    let page = positive_or(page_param, 1);
    let mut limit = positive_or(limit_param, settings.default_page_size);
    if limit <= 0 {
        return Err(CatalogError::InvalidParameter(format!(
            "page size must be positive, got {}",
            limit
        )));
    }

    if total_count == 0 {
        limit = 1;
    } else if limit > total_count {
        limit = total_count;
    }

    let total_pages = if total_count == 0 {
        0
    } else {
        (total_count - 1) / limit + 1
    };
    let page = page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * limit;
    let first = offset + 1;
    let last = offset + limit.min(total_count - offset);

    let next_page = (page < total_pages).then_some(page + 1);
    let prev_page = (page > 1).then_some(page - 1);

    Ok(Pagination {
        page,
        limit,
        offset,
        total_count,
        total_pages,
        first,
        last,
        next_page,
        prev_page,
        next_url: next_page.map(|p| page_url(current_url, p)),
        prev_url: prev_page.map(|p| page_url(current_url, p)),
    })
}

/// Rebuilds `current_url` with its `page` parameter set to `page`.
///
/// Query keys come out sorted, repeated values keep their relative order.
pub fn page_url(current_url: &Uri, page: i64) -> String {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(query) = current_url.query() {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    params.insert(PAGE_PARAM.to_string(), vec![page.to_string()]);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    format!("{}?{}", current_url.path(), serializer.finish())
}
