//! Saved-title membership.

use std::sync::Arc;

use reelmark_model::{ContentKey, ContentRef, UserId, WatchlistEntry, WatchlistRecord};
use tracing::debug;

use crate::database::ports::{RecordQuery, SortOrder, WatchlistField, WatchlistRepository};
use crate::error::{Result, WatchError};
use crate::watch_status::log_degraded_read;

/// Add, remove and check titles in a user's watchlist. Writes need a user;
/// reads never fail and fall back to "not saved" / empty.
#[derive(Clone)]
pub struct WatchlistTracker {
    repo: Arc<dyn WatchlistRepository>,
}

impl std::fmt::Debug for WatchlistTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistTracker")
            .field("repo", &std::any::type_name_of_val(self.repo.as_ref()))
            .finish()
    }
}

impl WatchlistTracker {
    pub fn new(repo: Arc<dyn WatchlistRepository>) -> Self {
        Self { repo }
    }

    /// Saves the title. Re-adding refreshes the metadata and `added_at`.
    pub async fn add(
        &self,
        user: Option<&UserId>,
        content: ContentRef,
        entry: WatchlistEntry,
    ) -> Result<WatchlistRecord> {
        let key = Self::key(user, content)?;
        let record = self.repo.upsert_entry(&key, &entry).await?;
        debug!(user = %key.user_id, content = %content, "added to watchlist");
        Ok(record)
    }

    /// Removing a title that is not saved is not an error.
    pub async fn remove(&self, user: Option<&UserId>, content: ContentRef) -> Result<()> {
        let key = Self::key(user, content)?;
        self.repo.delete_entry(&key).await?;
        debug!(user = %key.user_id, content = %content, "removed from watchlist");
        Ok(())
    }

    pub async fn is_member(&self, user: Option<&UserId>, content: ContentRef) -> bool {
        let Some(user) = user else {
            return false;
        };
        let key = ContentKey::new(user.clone(), content);
        match self.repo.get_entry(&key).await {
            Ok(entry) => entry.is_some(),
            Err(err) => {
                log_degraded_read("watchlist_membership", &err);
                false
            }
        }
    }

    /// Every saved title, newest first.
    pub async fn list(&self, user: Option<&UserId>) -> Vec<WatchlistRecord> {
        let Some(user) = user else {
            return Vec::new();
        };
        let query = RecordQuery::new().order_by(WatchlistField::AddedAt, SortOrder::Descending);
        match self.repo.query_entries(user, &query).await {
            Ok(records) => records,
            Err(err) => {
                log_degraded_read("watchlist", &err);
                Vec::new()
            }
        }
    }

    fn key(user: Option<&UserId>, content: ContentRef) -> Result<ContentKey> {
        let user = user.ok_or(WatchError::Unauthenticated)?;
        Ok(ContentKey::new(user.clone(), content))
    }
}
