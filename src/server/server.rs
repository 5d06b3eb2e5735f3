use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use tower_http::services::ServeDir;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{json_error, log_requests, state::*, ServerConfig};
use crate::catalog_store::{CatalogCounts, CatalogError};
use crate::releases::{ReleaseListParams, ReleasePage};
use crate::render::RenderMode;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub counts: CatalogCounts,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Ids in paths must be positive integers.
fn parse_entity_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

async fn home(State(renderer): State<GuardedRenderer>, headers: HeaderMap) -> Html<String> {
    Html(renderer.index(RenderMode::from_headers(&headers)))
}

async fn about(State(renderer): State<GuardedRenderer>, headers: HeaderMap) -> Html<String> {
    Html(renderer.about(RenderMode::from_headers(&headers)))
}

async fn load_release_page(
    state: &ServerState,
    uri: &axum::http::Uri,
) -> Result<ReleasePage, CatalogError> {
    let params = ReleaseListParams::from_query(uri.query());
    state
        .composer
        .paginated_releases(&params, uri, &state.config.pagination)
        .await
}

async fn get_releases(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    match load_release_page(&state, &uri).await {
        Ok(page) => {
            let mode = RenderMode::from_headers(&headers);
            Html(state.renderer.releases(mode, &page)).into_response()
        }
        Err(err) => {
            error!("Failed to load releases for {}: {}", uri, err);
            (err.status_code(), "Failed to load releases").into_response()
        }
    }
}

async fn get_releases_json(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match load_release_page(&state, &uri).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => {
            error!("Failed to load releases for {}: {}", uri, err);
            err.into_response()
        }
    }
}

async fn get_artist(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_entity_id(&raw_id) else {
        return json_error(StatusCode::BAD_REQUEST, "invalid artist ID");
    };

    match state.composer.artist_detail(id).await {
        Ok(artist) => {
            let mode = RenderMode::from_headers(&headers);
            Html(state.renderer.artist(mode, &artist)).into_response()
        }
        Err(CatalogError::NotFound { .. }) => json_error(StatusCode::NOT_FOUND, "artist not found"),
        Err(err) => {
            error!("Failed to fetch artist {}: {}", id, err);
            json_error(err.status_code(), "failed to fetch artist details")
        }
    }
}

async fn get_release(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_entity_id(&raw_id) else {
        return json_error(StatusCode::BAD_REQUEST, "invalid release ID");
    };

    match state.composer.release_detail(id).await {
        Ok(release) => {
            let mode = RenderMode::from_headers(&headers);
            Html(state.renderer.release(mode, &release)).into_response()
        }
        Err(CatalogError::NotFound { .. }) => json_error(StatusCode::NOT_FOUND, "release not found"),
        Err(err) => {
            error!("Failed to fetch release {}: {}", id, err);
            json_error(err.status_code(), "failed to fetch release details")
        }
    }
}

async fn get_stats(State(state): State<ServerState>) -> Response {
    match state.composer.counts().await {
        Ok(counts) => Json(ServerStats {
            uptime: format_uptime(state.start_time.elapsed()),
            hash: state.hash.clone(),
            counts,
        })
        .into_response(),
        Err(err) => {
            error!("Failed to read catalog counts: {}", err);
            err.into_response()
        }
    }
}

async fn not_found(
    State(renderer): State<GuardedRenderer>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let mode = RenderMode::from_headers(&headers);
    (StatusCode::NOT_FOUND, Html(renderer.not_found(mode, uri.path()))).into_response()
}

pub fn make_app(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Result<Router> {
    let state = ServerState::new(config.clone(), catalog_store, env!("GIT_HASH"));

    let api_routes: Router = Router::new()
        .route("/releases", get(get_releases_json))
        .route("/stats", get(get_stats))
        .with_state(state.clone());

    let mut app: Router = Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/releases", get(get_releases))
        .route("/artist/{artist_id}", get(get_artist))
        .route("/release/{release_id}", get(get_release))
        .fallback(not_found)
        .with_state(state.clone())
        .nest("/v1", api_routes);

    if let Some(static_dir) = &config.static_dir {
        if !static_dir.is_dir() {
            anyhow::bail!("Static directory does not exist: {:?}", static_dir);
        }
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app = app.layer(middleware::from_fn_with_state(
        config.requests_logging_level.clone(),
        log_requests,
    ));

    Ok(app)
}

pub async fn run_server(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", err);
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
