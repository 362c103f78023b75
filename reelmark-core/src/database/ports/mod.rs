//! Repository ports (interfaces) for the watch-state collections.

pub mod query;
pub mod ratings;
pub mod watch_progress;
pub mod watchlist;

pub use query::{
    FieldFilter, FilterOp, FilterValue, OrderBy, ProgressField,
    QueryableRecord, RecordQuery, SortOrder, WatchlistField,
};
pub use ratings::RatingsRepository;
pub use watch_progress::WatchProgressRepository;
pub use watchlist::WatchlistRepository;
