//! Shared constants for end-to-end tests
//!
//! When the demo seed changes, update only this file.

// ============================================================================
// Demo Catalog
// ============================================================================

/// Releases (and artists) inserted by the demo seed
pub const DEMO_RELEASE_COUNT: i64 = 30;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Artist 1, credited on "Album 1"
pub const ARTIST_1_NAME: &str = "Queen";

/// A search term matching "Album 1" and "Album 10" to "Album 19"
pub const ALBUM_1_SEARCH: &str = "Album 1";

pub const ALBUM_1_SEARCH_MATCHES: i64 = 11;

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
