use async_trait::async_trait;
use reelmark_model::{
    ProgressKey, ProgressUpdate, UserId, WatchProgressRecord,
};

use crate::database::ports::query::{ProgressField, RecordQuery};
use crate::error::PersistResult;

/// Keyed store for per-user, per-target playback positions.
///
/// Writes are full-document upserts: at most one record exists per key and
/// the store assigns `last_watched_at`.
#[async_trait]
pub trait WatchProgressRepository: Send + Sync {
    async fn get_progress(
        &self,
        key: &ProgressKey,
    ) -> PersistResult<Option<WatchProgressRecord>>;

    async fn upsert_progress(
        &self,
        key: &ProgressKey,
        update: &ProgressUpdate,
    ) -> PersistResult<WatchProgressRecord>;

    async fn query_progress(
        &self,
        user_id: &UserId,
        query: &RecordQuery<ProgressField>,
    ) -> PersistResult<Vec<WatchProgressRecord>>;

    async fn delete_progress(&self, key: &ProgressKey) -> PersistResult<()>;
}
