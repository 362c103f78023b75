use std::fmt;

use chrono::{DateTime, Utc};

use crate::content_type::ContentType;
use crate::ids::{ContentId, UserId};

/// Catalog entry identity independent of any user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentRef {
    pub content_type: ContentType,
    pub content_id: ContentId,
}

impl ContentRef {
    pub const fn new(content_type: ContentType, content_id: ContentId) -> Self {
        Self {
            content_type,
            content_id,
        }
    }

    pub const fn movie(id: u64) -> Self {
        Self::new(ContentType::Movie, ContentId(id))
    }

    pub const fn series(id: u64) -> Self {
        Self::new(ContentType::Series, ContentId(id))
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.content_id)
    }
}

const DEFAULT_SEASON: u16 = 1;
const DEFAULT_EPISODE: u16 = 1;

/// What is being played: a movie, or one episode of a series.
///
/// Movies never carry season or episode numbers; the constructors drop them.
/// Series targets always carry both: a missing season or episode falls back
/// to season 1 episode 1, the episode the player opens for a bare series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "WatchTargetParts"))]
pub struct WatchTarget {
    content: ContentRef,
    season: Option<u16>,
    episode: Option<u16>,
}

impl WatchTarget {
    pub fn new(
        content: ContentRef,
        season: Option<u16>,
        episode: Option<u16>,
    ) -> Self {
        match content.content_type {
            ContentType::Movie => Self {
                content,
                season: None,
                episode: None,
            },
            ContentType::Series => Self {
                content,
                season: Some(season.unwrap_or(DEFAULT_SEASON)),
                episode: Some(episode.unwrap_or(DEFAULT_EPISODE)),
            },
        }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(ContentRef::movie(id), None, None)
    }

    pub fn episode(series_id: u64, season: u16, episode: u16) -> Self {
        Self::new(ContentRef::series(series_id), Some(season), Some(episode))
    }

    pub fn content(&self) -> ContentRef {
        self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content.content_type
    }

    pub fn content_id(&self) -> ContentId {
        self.content.content_id
    }

    /// `None` for movies.
    pub fn season_number(&self) -> Option<u16> {
        self.season
    }

    /// `None` for movies.
    pub fn episode_number(&self) -> Option<u16> {
        self.episode
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct WatchTargetParts {
    content: ContentRef,
    season: Option<u16>,
    episode: Option<u16>,
}

#[cfg(feature = "serde")]
impl From<WatchTargetParts> for WatchTarget {
    fn from(parts: WatchTargetParts) -> Self {
        Self::new(parts.content, parts.season, parts.episode)
    }
}

impl fmt::Display for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)?;
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => write!(f, " s{season}e{episode}"),
            (Some(season), None) => write!(f, " s{season}"),
            (None, Some(episode)) => write!(f, " e{episode}"),
            (None, None) => Ok(()),
        }
    }
}

/// Identity of a watch-progress record: one per user and target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressKey {
    pub user_id: UserId,
    pub target: WatchTarget,
}

impl ProgressKey {
    pub fn new(user_id: UserId, target: WatchTarget) -> Self {
        Self { user_id, target }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.target)
    }
}

/// Identity of per-title user state (watchlist membership, ratings).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentKey {
    pub user_id: UserId,
    pub content: ContentRef,
}

impl ContentKey {
    pub fn new(user_id: UserId, content: ContentRef) -> Self {
        Self { user_id, content }
    }
}

/// Fields written by a single progress sample. The store assigns the
/// timestamp when persisting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressUpdate {
    pub title: String,
    pub poster_path: Option<String>,
    /// Percent watched, 0-100
    pub progress_percent: f64,
    pub current_time_secs: f64,
    pub duration_secs: f64,
}

impl ProgressUpdate {
    /// Clamps times to non-negative finite values and the percent to
    /// `[0, 100]`, re-deriving the percent from the times when the reported
    /// value is unusable.
    pub fn normalized(mut self) -> Self {
        self.current_time_secs = non_negative(self.current_time_secs);
        self.duration_secs = non_negative(self.duration_secs);
        if !self.progress_percent.is_finite() {
            self.progress_percent =
                derived_percent(self.current_time_secs, self.duration_secs);
        }
        self.progress_percent = self.progress_percent.clamp(0.0, 100.0);
        self
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// `current / duration * 100`, or 0 when the duration is unknown.
pub fn derived_percent(current_time_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 && current_time_secs.is_finite() {
        (current_time_secs / duration_secs * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Persisted playback position for one user and target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchProgressRecord {
    pub key: ProgressKey,
    pub title: String,
    pub poster_path: Option<String>,
    pub current_time_secs: f64,
    pub duration_secs: f64,
    pub progress_percent: f64,
    pub last_watched_at: DateTime<Utc>,
}

impl WatchProgressRecord {
    pub fn from_update(
        key: ProgressKey,
        update: ProgressUpdate,
        last_watched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            title: update.title,
            poster_path: update.poster_path,
            current_time_secs: update.current_time_secs,
            duration_secs: update.duration_secs,
            progress_percent: update.progress_percent,
            last_watched_at,
        }
    }

    pub fn target(&self) -> &WatchTarget {
        &self.key.target
    }

    pub fn content(&self) -> ContentRef {
        self.key.target.content()
    }
}

/// A title the user finished, used to seed "Since You Watched" rows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedEntry {
    pub content: ContentRef,
    pub title: String,
    pub last_watched_at: DateTime<Utc>,
}
