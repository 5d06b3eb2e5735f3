//! Demo catalog content used by `cli-catalog seed` and the test suites.

use super::models::{Artist, Release};

const DEMO_ARTIST_NAMES: [&str; 30] = [
    "Queen", "Radio", "Eagle", "Blurb", "Cream", "Oasis", "Panic", "Drake", "Kyuss", "Spark",
    "Patti", "Siren", "Beach", "Ratat", "Reign", "Shins", "Smoke", "Tracy", "Peach", "Moody",
    "Suede", "Flume", "Tonic", "Lorde", "Exile", "Mecca", "Jewel", "Spoon", "Adele", "Janes",
];

const DEMO_FIRST_YEAR: i64 = 1991;

#[derive(Clone, Debug)]
pub struct SeedData {
    pub releases: Vec<Release>,
    pub artists: Vec<Artist>,
    /// (release id, artist id) pairs.
    pub release_artists: Vec<(i64, i64)>,
}

impl SeedData {
    /// 30 releases named "Album N" released one per year from 1991, each
    /// credited to the artist with the same id.
    pub fn demo() -> Self {
        let releases = (1..=DEMO_ARTIST_NAMES.len() as i64)
            .map(|i| Release {
                id: i,
                title: format!("Album {}", i),
                year: DEMO_FIRST_YEAR + i - 1,
            })
            .collect();
        let artists = DEMO_ARTIST_NAMES
            .iter()
            .zip(1..)
            .map(|(name, id)| Artist {
                id,
                name: name.to_string(),
            })
            .collect();
        let release_artists = (1..=DEMO_ARTIST_NAMES.len() as i64)
            .map(|i| (i, i))
            .collect();

        SeedData {
            releases,
            artists,
            release_artists,
        }
    }
}
