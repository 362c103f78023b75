use std::sync::Arc;

use reelmark_model::{
    ContentTypeFilter, ProgressKey, UserId, WatchProgressRecord, WatchTarget,
};

use super::{ProgressThresholds, has_display_metadata, log_degraded_read};
use crate::config::WatchConfig;
use crate::database::ports::{
    FilterOp, FilterValue, ProgressField, RecordQuery, SortOrder,
    WatchProgressRepository,
};

/// Picks the continue-watching row out of a history snapshot.
///
/// `history` must already be ordered most recent first; that order is kept
/// as-is so records sharing a timestamp never swap places.
pub fn select_continue_watching(
    history: impl IntoIterator<Item = WatchProgressRecord>,
    thresholds: &ProgressThresholds,
    filter: ContentTypeFilter,
    limit: usize,
) -> Vec<WatchProgressRecord> {
    history
        .into_iter()
        .filter(|record| filter.matches(record.target().content_type()))
        .filter(|record| thresholds.is_in_progress(record.progress_percent))
        .filter(has_display_metadata)
        .take(limit)
        .collect()
}

/// Read side of watch progress. Every method is best effort: store failures
/// are logged and come back as empty results.
#[derive(Clone)]
pub struct ContinueWatchingResolver {
    repo: Arc<dyn WatchProgressRepository>,
    config: WatchConfig,
}

impl std::fmt::Debug for ContinueWatchingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinueWatchingResolver")
            .field("repo", &std::any::type_name_of_val(self.repo.as_ref()))
            .field("config", &self.config)
            .finish()
    }
}

impl ContinueWatchingResolver {
    pub fn new(repo: Arc<dyn WatchProgressRepository>, config: WatchConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Most recently watched records, newest first, capped at the configured
    /// history limit.
    pub async fn history(&self, user: &UserId) -> Vec<WatchProgressRecord> {
        let query = RecordQuery::new()
            .order_by(ProgressField::LastWatchedAt, SortOrder::Descending)
            .limit(self.config.history_limit);
        self.query_or_empty("watch_history", user, &query).await
    }

    pub async fn resolve(&self, user: &UserId) -> Vec<WatchProgressRecord> {
        self.resolve_filtered(user, ContentTypeFilter::All).await
    }

    pub async fn resolve_filtered(
        &self,
        user: &UserId,
        filter: ContentTypeFilter,
    ) -> Vec<WatchProgressRecord> {
        let history = self.history(user).await;
        select_continue_watching(
            history,
            &self.config.thresholds(),
            filter,
            self.config.continue_watching_limit,
        )
    }

    /// Records currently inside the in-progress band, straight from the
    /// store, without the display-metadata filter or the row cap.
    pub async fn in_progress(&self, user: &UserId) -> Vec<WatchProgressRecord> {
        let thresholds = self.config.thresholds();
        let query = RecordQuery::new()
            .filter(
                ProgressField::ProgressPercent,
                FilterOp::Gt,
                FilterValue::Number(thresholds.in_progress_floor),
            )
            .filter(
                ProgressField::ProgressPercent,
                FilterOp::Lt,
                FilterValue::Number(thresholds.completion),
            )
            .order_by(ProgressField::LastWatchedAt, SortOrder::Descending)
            .limit(self.config.history_limit);
        self.query_or_empty("in_progress", user, &query).await
    }

    /// Saved position for one target, used to resume playback.
    pub async fn resume_point(
        &self,
        user: Option<&UserId>,
        target: WatchTarget,
    ) -> Option<WatchProgressRecord> {
        let user = user?;
        let key = ProgressKey::new(user.clone(), target);
        match self.repo.get_progress(&key).await {
            Ok(record) => record,
            Err(err) => {
                log_degraded_read("resume_point", &err);
                None
            }
        }
    }

    async fn query_or_empty(
        &self,
        operation: &'static str,
        user: &UserId,
        query: &RecordQuery<ProgressField>,
    ) -> Vec<WatchProgressRecord> {
        match self.repo.query_progress(user, query).await {
            Ok(records) => records,
            Err(err) => {
                log_degraded_read(operation, &err);
                Vec::new()
            }
        }
    }
}
