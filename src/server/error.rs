//! Mapping of catalog errors onto HTTP responses.

use crate::catalog_store::CatalogError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::QueryFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the logs.
        let message = match &self {
            CatalogError::QueryFailure { .. } => "internal error".to_string(),
            other => other.to_string(),
        };
        json_error(status, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn maps_each_kind_to_a_status() {
        assert_eq!(
            CatalogError::InvalidParameter("limit".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::NotFound {
                entity: "release",
                id: 4
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::query("Failed", "disk I/O error").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CatalogError::DeadlineExceeded(Duration::from_secs(1)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[tokio::test]
    async fn query_failures_do_not_leak_details() {
        let response = CatalogError::query("Failed to count", "no such table: secret").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "internal error" }));
    }
}
