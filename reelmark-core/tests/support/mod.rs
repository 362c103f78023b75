#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reelmark_core::clock::ManualClock;
use reelmark_core::database::ports::{
    ProgressField, RatingsRepository, RecordQuery, WatchProgressRepository,
    WatchlistField, WatchlistRepository,
};
use reelmark_core::error::{PersistError, PersistResult};
use reelmark_core::providers::{ProviderError, RecommendationSource};
use reelmark_model::{
    ContentKey, ContentRef, ContentSummary, Page, ProgressKey, ProgressUpdate,
    UserId, UserRating, WatchProgressRecord, WatchlistEntry, WatchlistRecord,
};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "reelmark_core=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, 19, 30, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

pub fn user(uid: &str) -> UserId {
    UserId::new(uid).unwrap()
}

pub fn update(title: &str, percent: f64, current: f64, duration: f64) -> ProgressUpdate {
    ProgressUpdate {
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", title.to_lowercase().replace(' ', "-"))),
        progress_percent: percent,
        current_time_secs: current,
        duration_secs: duration,
    }
}

pub fn summary(content: ContentRef, title: &str) -> ContentSummary {
    ContentSummary {
        content,
        title: title.to_string(),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        vote_average: None,
        release_date: None,
    }
}

/// Store that fails every call with a fixed error kind.
#[derive(Debug, Clone, Copy)]
pub enum FailureKind {
    PermissionDenied,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct FailingStore {
    kind: FailureKind,
}

impl FailingStore {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    fn error(&self) -> PersistError {
        match self.kind {
            FailureKind::PermissionDenied => {
                PersistError::PermissionDenied("missing or insufficient permissions".into())
            }
            FailureKind::Unavailable => PersistError::Unavailable("connection reset".into()),
        }
    }
}

#[async_trait]
impl WatchProgressRepository for FailingStore {
    async fn get_progress(&self, _: &ProgressKey) -> PersistResult<Option<WatchProgressRecord>> {
        Err(self.error())
    }

    async fn upsert_progress(
        &self,
        _: &ProgressKey,
        _: &ProgressUpdate,
    ) -> PersistResult<WatchProgressRecord> {
        Err(self.error())
    }

    async fn query_progress(
        &self,
        _: &UserId,
        _: &RecordQuery<ProgressField>,
    ) -> PersistResult<Vec<WatchProgressRecord>> {
        Err(self.error())
    }

    async fn delete_progress(&self, _: &ProgressKey) -> PersistResult<()> {
        Err(self.error())
    }
}

#[async_trait]
impl WatchlistRepository for FailingStore {
    async fn get_entry(&self, _: &ContentKey) -> PersistResult<Option<WatchlistRecord>> {
        Err(self.error())
    }

    async fn upsert_entry(
        &self,
        _: &ContentKey,
        _: &WatchlistEntry,
    ) -> PersistResult<WatchlistRecord> {
        Err(self.error())
    }

    async fn query_entries(
        &self,
        _: &UserId,
        _: &RecordQuery<WatchlistField>,
    ) -> PersistResult<Vec<WatchlistRecord>> {
        Err(self.error())
    }

    async fn delete_entry(&self, _: &ContentKey) -> PersistResult<()> {
        Err(self.error())
    }
}

#[async_trait]
impl RatingsRepository for FailingStore {
    async fn get_rating(&self, _: &ContentKey) -> PersistResult<Option<UserRating>> {
        Err(self.error())
    }

    async fn upsert_rating(&self, _: &ContentKey, _: u8) -> PersistResult<UserRating> {
        Err(self.error())
    }
}

/// Recommendation source answering from a fixed script. Unscripted titles
/// fail with `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedRecommendations {
    pages: HashMap<ContentRef, Vec<ContentSummary>>,
    failing: Vec<ContentRef>,
    calls: Mutex<Vec<(ContentRef, u32)>>,
}

impl ScriptedRecommendations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, content: ContentRef, items: Vec<ContentSummary>) -> Self {
        self.pages.insert(content, items);
        self
    }

    pub fn failing_for(mut self, content: ContentRef) -> Self {
        self.failing.push(content);
        self
    }

    pub fn calls(&self) -> Vec<(ContentRef, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationSource for ScriptedRecommendations {
    async fn fetch_recommendations(
        &self,
        content: ContentRef,
        page: u32,
    ) -> Result<Page<ContentSummary>, ProviderError> {
        self.calls.lock().unwrap().push((content, page));
        if self.failing.contains(&content) {
            return Err(ProviderError::RateLimited);
        }
        self.pages
            .get(&content)
            .cloned()
            .map(Page::single)
            .ok_or(ProviderError::NotFound)
    }
}
