use std::sync::Arc;

use reelmark_model::{ProgressKey, ProgressUpdate, UserId, WatchProgressRecord, WatchTarget};
use tracing::debug;

use crate::database::ports::WatchProgressRepository;
use crate::error::{Result, WatchError};

/// Persists throttled playback samples as one record per user and target.
///
/// Callers decide how often to report (see [`super::ProgressThrottle`]) and
/// refresh any continue-watching view after a successful write.
#[derive(Clone)]
pub struct ProgressIngestor {
    repo: Arc<dyn WatchProgressRepository>,
}

impl std::fmt::Debug for ProgressIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressIngestor")
            .field("repo", &std::any::type_name_of_val(self.repo.as_ref()))
            .finish()
    }
}

impl ProgressIngestor {
    pub fn new(repo: Arc<dyn WatchProgressRepository>) -> Self {
        Self { repo }
    }

    /// Upserts the record for `(user, target)`, replacing every field of any
    /// previous sample.
    pub async fn report_progress(
        &self,
        user: Option<&UserId>,
        target: WatchTarget,
        update: ProgressUpdate,
    ) -> Result<WatchProgressRecord> {
        let user = user.ok_or(WatchError::Unauthenticated)?;
        let key = ProgressKey::new(user.clone(), target);
        let update = update.normalized();

        let record = self.repo.upsert_progress(&key, &update).await?;
        debug!(
            key = %key,
            percent = record.progress_percent,
            position = record.current_time_secs,
            "saved watch progress"
        );
        Ok(record)
    }
}
