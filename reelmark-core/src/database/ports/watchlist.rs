use async_trait::async_trait;
use reelmark_model::{ContentKey, UserId, WatchlistEntry, WatchlistRecord};

use crate::database::ports::query::{RecordQuery, WatchlistField};
use crate::error::PersistResult;

#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    async fn get_entry(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<WatchlistRecord>>;

    /// Overwrites any existing entry and stamps a fresh `added_at`.
    async fn upsert_entry(
        &self,
        key: &ContentKey,
        entry: &WatchlistEntry,
    ) -> PersistResult<WatchlistRecord>;

    async fn query_entries(
        &self,
        user_id: &UserId,
        query: &RecordQuery<WatchlistField>,
    ) -> PersistResult<Vec<WatchlistRecord>>;

    /// Deleting a missing entry is not an error.
    async fn delete_entry(&self, key: &ContentKey) -> PersistResult<()>;
}
