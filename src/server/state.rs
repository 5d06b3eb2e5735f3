use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::releases::ReleaseQueryComposer;
use crate::render::Renderer;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedComposer = Arc<ReleaseQueryComposer>;
pub type GuardedRenderer = Arc<Renderer>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub composer: GuardedComposer,
    pub renderer: GuardedRenderer,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog_store: GuardedCatalogStore, hash: &str) -> Self {
        let composer = ReleaseQueryComposer::new(catalog_store.clone(), config.query_timeout);
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            composer: Arc::new(composer),
            renderer: Arc::new(Renderer::new(env!("CARGO_PKG_VERSION"), hash)),
            hash: hash.to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedComposer {
    fn from_ref(input: &ServerState) -> Self {
        input.composer.clone()
    }
}

impl FromRef<ServerState> for GuardedRenderer {
    fn from_ref(input: &ServerState) -> Self {
        input.renderer.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
