//! Catalog Browser Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_store;
pub mod config;
pub mod releases;
pub mod render;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogError, CatalogStore, SqliteCatalogStore};
pub use releases::{compute_pagination, Pagination, ReleaseFilter, ReleaseQueryComposer};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
