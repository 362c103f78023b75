//! Core data model definitions shared across Reelmark crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod catalog;
pub mod content_type;
pub mod error;
pub mod ids;
pub mod image;
pub mod player;
pub mod prelude;
pub mod rating;
pub mod watch;
pub mod watchlist;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{ContentSummary, Page, RecommendationSection};
pub use content_type::{ContentType, ContentTypeFilter};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ContentId, UserId};
pub use image::{BackdropSize, ImageSize, PosterSize};
pub use player::{PlayerEvent, PlayerEventKind};
pub use rating::{MAX_RATING, MIN_RATING, UserRating, is_valid_rating};
pub use watch::{
    CompletedEntry, ContentKey, ContentRef, ProgressKey, ProgressUpdate,
    WatchProgressRecord, WatchTarget, derived_percent,
};
pub use watchlist::{WatchlistEntry, WatchlistRecord};
