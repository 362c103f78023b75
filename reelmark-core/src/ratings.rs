//! A user's own 1-10 scores.

use std::sync::Arc;

use reelmark_model::{ContentKey, ContentRef, UserId, UserRating, is_valid_rating};
use tracing::debug;

use crate::database::ports::RatingsRepository;
use crate::error::{Result, WatchError};
use crate::watch_status::log_degraded_read;

#[derive(Clone)]
pub struct RatingsTracker {
    repo: Arc<dyn RatingsRepository>,
}

impl std::fmt::Debug for RatingsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingsTracker")
            .field("repo", &std::any::type_name_of_val(self.repo.as_ref()))
            .finish()
    }
}

impl RatingsTracker {
    pub fn new(repo: Arc<dyn RatingsRepository>) -> Self {
        Self { repo }
    }

    /// Creates or replaces the rating. Out-of-range values are rejected
    /// before touching the store.
    pub async fn save(
        &self,
        user: Option<&UserId>,
        content: ContentRef,
        rating: u8,
    ) -> Result<UserRating> {
        let user = user.ok_or(WatchError::Unauthenticated)?;
        if !is_valid_rating(rating) {
            return Err(WatchError::InvalidRating(rating));
        }
        let key = ContentKey::new(user.clone(), content);
        let saved = self.repo.upsert_rating(&key, rating).await?;
        debug!(user = %user, content = %content, rating, "saved rating");
        Ok(saved)
    }

    pub async fn get(&self, user: Option<&UserId>, content: ContentRef) -> Option<UserRating> {
        let key = ContentKey::new(user?.clone(), content);
        match self.repo.get_rating(&key).await {
            Ok(rating) => rating,
            Err(err) => {
                log_degraded_read("user_rating", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryWatchStore;

    #[tokio::test]
    async fn rejects_out_of_range_ratings() {
        let tracker = RatingsTracker::new(Arc::new(MemoryWatchStore::new()));
        let user = UserId::new("u1").unwrap();

        for rating in [0, 11] {
            let err = tracker
                .save(Some(&user), ContentRef::movie(1), rating)
                .await
                .unwrap_err();
            assert!(matches!(err, WatchError::InvalidRating(r) if r == rating));
        }
        assert!(tracker.get(Some(&user), ContentRef::movie(1)).await.is_none());
    }

    #[tokio::test]
    async fn anonymous_users_cannot_rate() {
        let tracker = RatingsTracker::new(Arc::new(MemoryWatchStore::new()));
        let err = tracker.save(None, ContentRef::movie(1), 8).await.unwrap_err();
        assert!(matches!(err, WatchError::Unauthenticated));
        assert!(tracker.get(None, ContentRef::movie(1)).await.is_none());
    }
}
