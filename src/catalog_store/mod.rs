mod error;
mod models;
mod schema;
mod seed;
mod store;
mod trait_def;

pub use error::{BoxedError, CatalogError, CatalogResult};
pub use models::*;
pub use schema::{CATALOG_VERSIONED_SCHEMAS, RELEASES_FTS_TABLE_NAME};
pub use seed::SeedData;
pub use store::SqliteCatalogStore;
pub use trait_def::{CatalogStore, QueryParam};
