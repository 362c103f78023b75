//! Process-local store used by tests, demos and offline sessions.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reelmark_model::{
    ContentKey, ProgressKey, ProgressUpdate, UserId, UserRating,
    WatchProgressRecord, WatchlistEntry, WatchlistRecord,
};
use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::database::document_id::{content_document_id, progress_document_id};
use crate::database::ports::{
    ProgressField, RatingsRepository, RecordQuery, WatchProgressRepository,
    WatchlistField, WatchlistRepository,
};
use crate::error::PersistResult;

/// Implements every port on ordered maps keyed by document id, so records
/// that tie on the sort field come back in a stable order.
#[derive(Clone, Debug)]
pub struct MemoryWatchStore {
    clock: Arc<dyn Clock>,
    progress: Arc<Mutex<BTreeMap<String, WatchProgressRecord>>>,
    watchlist: Arc<Mutex<BTreeMap<String, WatchlistRecord>>>,
    ratings: Arc<Mutex<BTreeMap<String, UserRating>>>,
}

impl Default for MemoryWatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWatchStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            progress: Arc::default(),
            watchlist: Arc::default(),
            ratings: Arc::default(),
        }
    }

    pub async fn progress_len(&self) -> usize {
        self.progress.lock().await.len()
    }

    pub async fn watchlist_len(&self) -> usize {
        self.watchlist.lock().await.len()
    }
}

#[async_trait]
impl WatchProgressRepository for MemoryWatchStore {
    async fn get_progress(
        &self,
        key: &ProgressKey,
    ) -> PersistResult<Option<WatchProgressRecord>> {
        let guard = self.progress.lock().await;
        Ok(guard.get(&progress_document_id(key)).cloned())
    }

    async fn upsert_progress(
        &self,
        key: &ProgressKey,
        update: &ProgressUpdate,
    ) -> PersistResult<WatchProgressRecord> {
        let record = WatchProgressRecord::from_update(
            key.clone(),
            update.clone(),
            self.clock.now(),
        );
        let mut guard = self.progress.lock().await;
        guard.insert(progress_document_id(key), record.clone());
        Ok(record)
    }

    async fn query_progress(
        &self,
        user_id: &UserId,
        query: &RecordQuery<ProgressField>,
    ) -> PersistResult<Vec<WatchProgressRecord>> {
        let guard = self.progress.lock().await;
        let scoped = guard
            .values()
            .filter(|record| &record.key.user_id == user_id)
            .cloned();
        Ok(query.apply(scoped))
    }

    async fn delete_progress(&self, key: &ProgressKey) -> PersistResult<()> {
        let mut guard = self.progress.lock().await;
        guard.remove(&progress_document_id(key));
        Ok(())
    }
}

#[async_trait]
impl WatchlistRepository for MemoryWatchStore {
    async fn get_entry(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<WatchlistRecord>> {
        let guard = self.watchlist.lock().await;
        Ok(guard.get(&content_document_id(key)).cloned())
    }

    async fn upsert_entry(
        &self,
        key: &ContentKey,
        entry: &WatchlistEntry,
    ) -> PersistResult<WatchlistRecord> {
        let record = WatchlistRecord::from_entry(
            key.clone(),
            entry.clone(),
            self.clock.now(),
        );
        let mut guard = self.watchlist.lock().await;
        guard.insert(content_document_id(key), record.clone());
        Ok(record)
    }

    async fn query_entries(
        &self,
        user_id: &UserId,
        query: &RecordQuery<WatchlistField>,
    ) -> PersistResult<Vec<WatchlistRecord>> {
        let guard = self.watchlist.lock().await;
        let scoped = guard
            .values()
            .filter(|record| &record.key.user_id == user_id)
            .cloned();
        Ok(query.apply(scoped))
    }

    async fn delete_entry(&self, key: &ContentKey) -> PersistResult<()> {
        let mut guard = self.watchlist.lock().await;
        guard.remove(&content_document_id(key));
        Ok(())
    }
}

#[async_trait]
impl RatingsRepository for MemoryWatchStore {
    async fn get_rating(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<UserRating>> {
        let guard = self.ratings.lock().await;
        Ok(guard.get(&content_document_id(key)).cloned())
    }

    async fn upsert_rating(
        &self,
        key: &ContentKey,
        rating: u8,
    ) -> PersistResult<UserRating> {
        let now = self.clock.now();
        let mut guard = self.ratings.lock().await;
        let entry = guard
            .entry(content_document_id(key))
            .or_insert_with(|| UserRating {
                key: key.clone(),
                rating,
                created_at: now,
                updated_at: now,
            });
        entry.rating = rating;
        entry.updated_at = now;
        Ok(entry.clone())
    }
}
