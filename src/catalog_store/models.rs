use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Release {
    pub id: i64,
    pub title: String,
    pub year: i64,
}

/// One row of the release listing, as projected by the search index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReleaseListing {
    pub release_id: i64,
    pub release_title: String,
    pub release_year: i64,
    pub artist_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReleaseDetail {
    #[serde(flatten)]
    pub release: Release,
    pub artists: Vec<Artist>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub releases: Vec<Release>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub releases: usize,
    pub artists: usize,
    /// Rows currently in the search index, lags `releases` until a rebuild.
    pub indexed_releases: usize,
}
