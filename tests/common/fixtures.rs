//! Test fixture creation
//!
//! Builds a temporary catalog database seeded with the demo data.

use anyhow::Result;
use catalog_browser::catalog_store::{CatalogStore, SeedData, SqliteCatalogStore};
use tempfile::TempDir;

/// Creates a seeded and indexed catalog in a fresh temporary directory.
///
/// Returns the directory (keep it alive for the duration of the test) and the
/// opened store.
pub fn create_test_catalog() -> Result<(TempDir, SqliteCatalogStore)> {
    let temp_dir = TempDir::new()?;
    let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db"), 2)?;
    store.seed(&SeedData::demo())?;
    store.rebuild_search_index()?;
    Ok((temp_dir, store))
}
