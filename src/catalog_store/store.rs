//! SQLite-backed catalog store implementation.
//!
//! Provides the `SqliteCatalogStore`, which runs listing and search queries
//! against the `releases_fts` index and entity lookups against the base tables.

use super::error::{CatalogError, CatalogResult};
use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::seed::SeedData;
use super::trait_def::{CatalogStore, QueryParam};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

const REBUILD_SEARCH_INDEX_SQL: &str = "INSERT INTO releases_fts (release_id, artist_name, release_name, release_year)
     SELECT
         releases.id,
         artists.name,
         releases.name,
         releases.year
     FROM release_artists
         JOIN artists ON release_artists.artist_id = artists.id
         JOIN releases ON release_artists.release_id = releases.id";

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    db_path: PathBuf,
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Catalog db has user_version {}, which was not written by this application",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Catalog db is at version {}, newer than the latest known version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating catalog db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Catalog db does not match the expected schema")
}

fn lock(conn: &Mutex<Connection>) -> CatalogResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| CatalogError::query("Failed to acquire catalog connection", "lock poisoned"))
}

fn release_listing_from_row(row: &Row) -> rusqlite::Result<ReleaseListing> {
    Ok(ReleaseListing {
        release_id: row.get(0)?,
        release_title: row.get(1)?,
        release_year: row.get(2)?,
        artist_name: row.get(3)?,
    })
}

fn release_from_row(row: &Row) -> rusqlite::Result<Release> {
    Ok(Release {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
    })
}

fn artist_from_row(row: &Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl SqliteCatalogStore {
    /// Opens (or creates) the catalog database at `db_path`, migrating its
    /// schema to the latest version.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections used for concurrent reads
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path_ref))?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut write_conn)?;

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            db_path: db_path_ref.to_path_buf(),
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Inserts releases, artists and their links. Rows whose id already
    /// exists are left untouched, so seeding twice is harmless.
    ///
    /// The search index is not touched; call `rebuild_search_index` afterwards.
    pub fn seed(&self, seed: &SeedData) -> Result<()> {
        let mut conn = self
            .write_conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Catalog write connection lock poisoned"))?;
        let tx = conn.transaction()?;
        {
            let mut insert_release =
                tx.prepare("INSERT OR IGNORE INTO releases (id, name, year) VALUES (?1, ?2, ?3)")?;
            for release in &seed.releases {
                insert_release.execute(params![release.id, release.title, release.year])?;
            }

            let mut insert_artist =
                tx.prepare("INSERT OR IGNORE INTO artists (id, name) VALUES (?1, ?2)")?;
            for artist in &seed.artists {
                insert_artist.execute(params![artist.id, artist.name])?;
            }

            let mut insert_link = tx.prepare(
                "INSERT OR IGNORE INTO release_artists (id, release_id, artist_id) VALUES (?1, ?2, ?3)",
            )?;
            for (index, (release_id, artist_id)) in seed.release_artists.iter().enumerate() {
                insert_link.execute(params![index as i64 + 1, release_id, artist_id])?;
            }
        }
        tx.commit().context("Failed to commit seed data")?;

        info!(
            "Seeded {} releases, {} artists, {} release-artist links",
            seed.releases.len(),
            seed.artists.len(),
            seed.release_artists.len()
        );
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn query_scalar(&self, sql: &str, params: &[QueryParam]) -> CatalogResult<i64> {
        let conn = self.get_read_conn();
        let conn = lock(&conn)?;
        debug!("Executing scalar query: {} with {:?}", sql, params);
        conn.query_row(sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(|e| CatalogError::query("Failed to execute scalar query", e))
    }

    fn query_release_listings(
        &self,
        sql: &str,
        params: &[QueryParam],
    ) -> CatalogResult<Vec<ReleaseListing>> {
        let conn = self.get_read_conn();
        let conn = lock(&conn)?;
        debug!("Executing listing query: {} with {:?}", sql, params);
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CatalogError::query("Failed to prepare listing query", e))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), release_listing_from_row)
            .map_err(|e| CatalogError::query("Failed to execute listing query", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| CatalogError::query("Failed to read listing row", e))
    }

    fn get_artist(&self, id: i64) -> CatalogResult<Option<ArtistDetail>> {
        let conn = self.get_read_conn();
        let conn = lock(&conn)?;

        let artist = conn
            .query_row(
                "SELECT id, name FROM artists WHERE id = ?1",
                params![id],
                artist_from_row,
            )
            .optional()
            .map_err(|e| CatalogError::query("Failed to retrieve artist", e))?;
        let Some(artist) = artist else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(
                "SELECT releases.id, releases.name, releases.year
                 FROM release_artists
                     JOIN releases ON release_artists.release_id = releases.id
                 WHERE release_artists.artist_id = ?1
                 ORDER BY releases.year ASC, releases.id ASC",
            )
            .map_err(|e| CatalogError::query("Failed to prepare artist releases query", e))?;
        let releases = stmt
            .query_map(params![id], release_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| CatalogError::query("Failed to retrieve artist releases", e))?;

        Ok(Some(ArtistDetail { artist, releases }))
    }

    fn get_release(&self, id: i64) -> CatalogResult<Option<ReleaseDetail>> {
        let conn = self.get_read_conn();
        let conn = lock(&conn)?;

        let release = conn
            .query_row(
                "SELECT id, name, year FROM releases WHERE id = ?1",
                params![id],
                release_from_row,
            )
            .optional()
            .map_err(|e| CatalogError::query("Failed to retrieve release", e))?;
        let Some(release) = release else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(
                "SELECT artists.id, artists.name
                 FROM release_artists
                     JOIN artists ON release_artists.artist_id = artists.id
                 WHERE release_artists.release_id = ?1
                 ORDER BY artists.id ASC",
            )
            .map_err(|e| CatalogError::query("Failed to prepare release artists query", e))?;
        let artists = stmt
            .query_map(params![id], artist_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| CatalogError::query("Failed to retrieve release artists", e))?;

        Ok(Some(ReleaseDetail { release, artists }))
    }

    fn rebuild_search_index(&self) -> CatalogResult<usize> {
        let mut conn = lock(&self.write_conn)?;
        let tx = conn
            .transaction()
            .map_err(|e| CatalogError::query("Failed to begin search index rebuild", e))?;
        tx.execute("DELETE FROM releases_fts", [])
            .map_err(|e| CatalogError::query("Failed to clear search index", e))?;
        let indexed = tx
            .execute(REBUILD_SEARCH_INDEX_SQL, [])
            .map_err(|e| CatalogError::query("Failed to populate search index", e))?;
        tx.commit()
            .map_err(|e| CatalogError::query("Failed to commit search index rebuild", e))?;

        info!("Search index rebuilt with {} rows", indexed);
        Ok(indexed)
    }

    fn get_counts(&self) -> CatalogResult<CatalogCounts> {
        let conn = self.get_read_conn();
        let conn = lock(&conn)?;
        let count = |table: &str| -> CatalogResult<usize> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                r.get::<_, i64>(0)
            })
            .map(|count| count as usize)
            .map_err(|e| CatalogError::query(format!("Failed to count {}", table), e))
        };

        Ok(CatalogCounts {
            releases: count("releases")?,
            artists: count("artists")?,
            indexed_releases: count("releases_fts")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, SqliteCatalogStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(dir.path().join("catalog.db"), 2).unwrap();
        store.seed(&SeedData::demo()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_database_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(dir.path().join("catalog.db"), 1).unwrap();
        assert_eq!(store.get_counts().unwrap(), CatalogCounts::default());
    }

    #[test]
    fn test_reopening_existing_database_keeps_data() {
        let (dir, store) = seeded_store();
        drop(store);

        let reopened = SqliteCatalogStore::new(dir.path().join("catalog.db"), 1).unwrap();
        assert_eq!(reopened.get_counts().unwrap().releases, 30);
    }

    #[test]
    fn test_opening_v0_database_migrates_to_latest() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");
        {
            let conn = Connection::open(&db_path).unwrap();
            CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        }

        let _store = SqliteCatalogStore::new(&db_path, 1).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(
            version as usize,
            BASE_DB_VERSION + CATALOG_VERSIONED_SCHEMAS.len() - 1
        );
    }

    #[test]
    fn test_foreign_database_is_rejected() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE unrelated (id INTEGER)", [])
                .unwrap();
        }

        let result = SqliteCatalogStore::new(&db_path, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_seeding_twice_does_not_duplicate() {
        let (_dir, store) = seeded_store();
        store.seed(&SeedData::demo()).unwrap();

        let counts = store.get_counts().unwrap();
        assert_eq!(counts.releases, 30);
        assert_eq!(counts.artists, 30);
    }

    #[test]
    fn test_search_index_is_stale_until_rebuilt() {
        let (_dir, store) = seeded_store();
        assert_eq!(store.get_counts().unwrap().indexed_releases, 0);

        assert_eq!(store.rebuild_search_index().unwrap(), 30);
        assert_eq!(store.get_counts().unwrap().indexed_releases, 30);

        // Rebuilding replaces rows instead of appending.
        assert_eq!(store.rebuild_search_index().unwrap(), 30);
        assert_eq!(store.get_counts().unwrap().indexed_releases, 30);
    }

    #[test]
    fn test_query_release_listings_maps_columns() {
        let (_dir, store) = seeded_store();
        store.rebuild_search_index().unwrap();

        let rows = store
            .query_release_listings(
                "SELECT CAST(release_id AS INTEGER), release_name,
                        CAST(release_year AS INTEGER), artist_name
                 FROM releases_fts WHERE release_id = ?1",
                &[QueryParam::Integer(1)],
            )
            .unwrap();
        assert_eq!(
            rows,
            vec![ReleaseListing {
                release_id: 1,
                release_title: "Album 1".to_string(),
                release_year: 1991,
                artist_name: "Queen".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_sql_is_a_query_failure() {
        let (_dir, store) = seeded_store();
        let err = store
            .query_scalar("SELECT COUNT(*) FROM missing_table", &[])
            .unwrap_err();
        assert!(matches!(err, CatalogError::QueryFailure { .. }));
    }

    #[test]
    fn test_get_artist_with_releases() {
        let (_dir, store) = seeded_store();
        let artist = store.get_artist(6).unwrap().unwrap();
        assert_eq!(artist.artist.name, "Oasis");
        assert_eq!(
            artist.releases,
            vec![Release {
                id: 6,
                title: "Album 6".to_string(),
                year: 1996,
            }]
        );
        assert!(store.get_artist(9999).unwrap().is_none());
    }

    #[test]
    fn test_get_release_with_artists() {
        let (_dir, store) = seeded_store();
        let release = store.get_release(2).unwrap().unwrap();
        assert_eq!(release.release.title, "Album 2");
        assert_eq!(release.release.year, 1992);
        assert_eq!(release.artists.len(), 1);
        assert_eq!(release.artists[0].name, "Radio");
        assert!(store.get_release(9999).unwrap().is_none());
    }
}
