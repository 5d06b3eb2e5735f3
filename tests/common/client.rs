//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all catalog-browser
//! endpoints. When routes or parameters change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

/// Optional listing parameters, sent only when set.
#[derive(Default, Clone, Copy)]
pub struct ListingQuery<'a> {
    pub page: Option<&'a str>,
    pub page_size: Option<&'a str>,
    pub q: Option<&'a str>,
}

impl ListingQuery<'_> {
    fn pairs(&self) -> Vec<(&str, &str)> {
        [("page", self.page), ("page_size", self.page_size), ("q", self.q)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET on a path relative to the server root, e.g. the `nextUrl` of a
    /// listing.
    pub async fn get_path(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Pages
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get_path("/").await
    }

    pub async fn get_about(&self) -> Response {
        self.get_path("/about").await
    }

    /// GET /releases, as htmx would issue it when `htmx` is true.
    pub async fn get_releases_page(&self, query: ListingQuery<'_>, htmx: bool) -> Response {
        let mut request = self
            .client
            .get(format!("{}/releases", self.base_url))
            .query(&query.pairs());
        if htmx {
            request = request.header("HX-Request", "true");
        }
        request.send().await.expect("Request failed")
    }

    pub async fn get_artist(&self, id: &str) -> Response {
        self.get_path(&format!("/artist/{}", id)).await
    }

    pub async fn get_release(&self, id: &str) -> Response {
        self.get_path(&format!("/release/{}", id)).await
    }

    // ========================================================================
    // JSON API
    // ========================================================================

    pub async fn get_releases_json(&self, query: ListingQuery<'_>) -> Response {
        self.client
            .get(format!("{}/v1/releases", self.base_url))
            .query(&query.pairs())
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_stats(&self) -> Response {
        self.get_path("/v1/stats").await
    }
}
