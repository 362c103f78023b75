//! Holders for fetched rows that refuse results from superseded fetches.
//!
//! A consumer calls [`ViewSlot::begin`] before fetching and hands the ticket
//! back with the result. Invalidating the slot (a write that changed the
//! data, or the view going away) bumps the generation, so late results from
//! older fetches are dropped instead of overwriting newer state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reelmark_model::{ContentTypeFilter, UserId, WatchProgressRecord};
use tokio::sync::Mutex;

use super::ContinueWatchingResolver;

/// Generation stamp handed out by [`ViewSlot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub struct ViewSlot<T> {
    generation: AtomicU64,
    value: Mutex<Option<T>>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.generation.load(Ordering::Acquire))
    }

    /// Stores `value` if no invalidation happened since `ticket` was taken.
    pub async fn apply(&self, ticket: FetchTicket, value: T) -> bool {
        let mut slot = self.value.lock().await;
        if self.generation.load(Ordering::Acquire) != ticket.0 {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Clears the held value and turns every outstanding ticket stale.
    pub async fn invalidate(&self) {
        let mut slot = self.value.lock().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *slot = None;
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}

impl<T: Clone> ViewSlot<T> {
    pub async fn current(&self) -> Option<T> {
        self.value.lock().await.clone()
    }
}

/// Continue-watching row for one user, refreshed through a [`ViewSlot`].
#[derive(Debug, Clone)]
pub struct ContinueWatchingView {
    resolver: ContinueWatchingResolver,
    user: UserId,
    filter: ContentTypeFilter,
    slot: Arc<ViewSlot<Vec<WatchProgressRecord>>>,
}

impl ContinueWatchingView {
    pub fn new(
        resolver: ContinueWatchingResolver,
        user: UserId,
        filter: ContentTypeFilter,
    ) -> Self {
        Self {
            resolver,
            user,
            filter,
            slot: Arc::new(ViewSlot::new()),
        }
    }

    /// Re-resolves the row. Returns `None` when the view was invalidated
    /// while the fetch was in flight; the stale result is discarded.
    pub async fn refresh(&self) -> Option<Vec<WatchProgressRecord>> {
        let ticket = self.slot.begin();
        let rows = self.resolver.resolve_filtered(&self.user, self.filter).await;
        if self.slot.apply(ticket, rows.clone()).await {
            Some(rows)
        } else {
            None
        }
    }

    pub async fn rows(&self) -> Vec<WatchProgressRecord> {
        self.slot.current().await.unwrap_or_default()
    }

    pub async fn invalidate(&self) {
        self.slot.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_ticket_is_rejected_after_invalidate() {
        let slot = ViewSlot::new();
        let stale = slot.begin();
        slot.invalidate().await;
        let fresh = slot.begin();

        assert!(!slot.apply(stale, vec![1]).await);
        assert_eq!(slot.current().await, None);
        assert!(slot.apply(fresh, vec![2]).await);
        assert_eq!(slot.current().await, Some(vec![2]));
    }

    #[tokio::test]
    async fn invalidate_clears_the_value() {
        let slot = ViewSlot::new();
        let ticket = slot.begin();
        assert!(slot.apply(ticket, "row").await);
        slot.invalidate().await;
        assert!(!slot.is_current(ticket));
        assert_eq!(slot.current().await, None);
    }
}
