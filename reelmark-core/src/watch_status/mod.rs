//! Watch-progress ingestion and the rows derived from it.
//!
//! Continue watching and completions are pure functions over a snapshot of
//! progress records; nothing derived here is ever persisted.

pub mod completion;
pub mod continue_watching;
pub mod ingest;
pub mod throttle;
pub mod view;

pub use completion::{
    RecommendationTrigger, dedup_by_identity, derive_completions,
};
pub use continue_watching::{ContinueWatchingResolver, select_continue_watching};
pub use ingest::ProgressIngestor;
pub use throttle::ProgressThrottle;
pub use view::{ContinueWatchingView, FetchTicket, ViewSlot};

use reelmark_model::WatchProgressRecord;
use tracing::{error, warn};

use crate::error::PersistError;

/// Percent bounds separating "started", "in progress" and "completed".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressThresholds {
    /// Exclusive lower bound of the in-progress band.
    pub in_progress_floor: f64,
    /// Inclusive completion threshold, also the exclusive upper bound of the
    /// in-progress band.
    pub completion: f64,
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self {
            in_progress_floor: 5.0,
            completion: 95.0,
        }
    }
}

impl ProgressThresholds {
    pub fn is_in_progress(&self, percent: f64) -> bool {
        percent > self.in_progress_floor && percent < self.completion
    }

    pub fn is_completed(&self, percent: f64) -> bool {
        percent >= self.completion
    }
}

/// Titles written before catalog metadata arrived carry the media type as a
/// stand-in. Kept for compatibility with existing records.
pub fn is_placeholder_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty() || title == "movie" || title == "tv"
}

/// Enough metadata to render a card: a real title and a poster.
pub fn has_display_metadata(record: &WatchProgressRecord) -> bool {
    !is_placeholder_title(&record.title)
        && record
            .poster_path
            .as_deref()
            .is_some_and(|poster| !poster.trim().is_empty())
}

/// Logs a failure a read path is about to swallow.
pub(crate) fn log_degraded_read(operation: &'static str, err: &PersistError) {
    if err.is_permission_denied() {
        warn!(operation, error = %err, "store refused read; treating user as not signed in");
    } else {
        error!(operation, error = %err, "store read failed; degrading to empty result");
    }
}
