//! Snapshot of the types surface for embedding applications.
//! Prefer importing from this module instead of individual tree nodes when
//! wiring a front-end on top of reelmark-core.

pub use super::catalog::{ContentSummary, Page, RecommendationSection};
pub use super::content_type::{ContentType, ContentTypeFilter};
pub use super::ids::{ContentId, UserId};
pub use super::image::{BackdropSize, ImageSize, PosterSize};
pub use super::player::{PlayerEvent, PlayerEventKind};
pub use super::rating::UserRating;
pub use super::watch::{
    CompletedEntry, ContentKey, ContentRef, ProgressKey, ProgressUpdate,
    WatchProgressRecord, WatchTarget,
};
pub use super::watchlist::{WatchlistEntry, WatchlistRecord};
