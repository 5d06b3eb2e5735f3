//! SQLite schema definitions for the release catalog database.
//!
//! Base tables hold releases, artists and their association. The
//! `releases_fts` virtual table is a denormalized projection of the three,
//! used for listing and full-text search. It is not kept in sync by triggers
//! and has to be rebuilt explicitly after the base tables change.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, VirtualTable,
};
use anyhow::Result;
use rusqlite::Connection;

pub const RELEASES_FTS_TABLE_NAME: &str = "releases_fts";

const RELEASES_TABLE: Table = Table {
    name: "releases",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const RELEASE_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "releases",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ARTIST_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const RELEASE_ARTISTS_TABLE_V0: Table = Table {
    name: "release_artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "release_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&RELEASE_FOREIGN_KEY)
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FOREIGN_KEY)
        ),
    ],
    indices: &[],
};

/// V1 adds lookup indices on both sides of the association, used by the
/// detail pages and the search index rebuild.
const RELEASE_ARTISTS_TABLE_V1: Table = Table {
    name: "release_artists",
    columns: RELEASE_ARTISTS_TABLE_V0.columns,
    indices: &[
        ("idx_release_artists_release", "release_id"),
        ("idx_release_artists_artist", "artist_id"),
    ],
};

const RELEASES_FTS_TABLE: VirtualTable = VirtualTable {
    name: RELEASES_FTS_TABLE_NAME,
    module: "fts5",
    arguments: &[
        "release_id UNINDEXED",
        "release_name",
        "release_year",
        "artist_name",
        "tokenize=\"trigram\"",
    ],
};

fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    RELEASE_ARTISTS_TABLE_V1.create_indices(conn)
}

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[RELEASES_TABLE, ARTISTS_TABLE, RELEASE_ARTISTS_TABLE_V0],
        virtual_tables: &[RELEASES_FTS_TABLE],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[RELEASES_TABLE, ARTISTS_TABLE, RELEASE_ARTISTS_TABLE_V1],
        virtual_tables: &[RELEASES_FTS_TABLE],
        migration: Some(migrate_v0_to_v1),
    },
];
