use chrono::{DateTime, Utc};

use crate::watch::{ContentKey, ContentRef};

/// Display metadata captured when a title is saved to the watchlist.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchlistEntry {
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    /// Catalog vote average at the time the title was saved
    pub rating: Option<f32>,
}

/// A saved title. Presence of the record is the membership signal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchlistRecord {
    pub key: ContentKey,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f32>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistRecord {
    pub fn from_entry(
        key: ContentKey,
        entry: WatchlistEntry,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            title: entry.title,
            poster_path: entry.poster_path,
            backdrop_path: entry.backdrop_path,
            overview: entry.overview,
            rating: entry.rating,
            added_at,
        }
    }

    pub fn content(&self) -> ContentRef {
        self.key.content
    }
}
