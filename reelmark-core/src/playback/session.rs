use reelmark_model::{PlayerEvent, ProgressUpdate, UserId, WatchProgressRecord, WatchTarget};
use tracing::{debug, warn};

use super::embed::EmbedOptions;
use super::message::parse_player_message;
use crate::error::Result;
use crate::watch_status::{
    ContinueWatchingResolver, ContinueWatchingView, ProgressIngestor, ProgressThrottle,
};

/// What happened to one player event.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Not a `timeupdate` for this session's title, or not a player event.
    Ignored,
    /// Held back by the sampling gate.
    Throttled,
    Saved(WatchProgressRecord),
}

/// One title being played by one user.
///
/// Feeds the player's `timeupdate` events for the session title through a
/// [`ProgressThrottle`] into the [`ProgressIngestor`]. When the player's
/// episode controls move to another episode of the same series, the session
/// follows it and saves progress under the new episode.
#[derive(Debug)]
pub struct PlaybackSession {
    user: Option<UserId>,
    target: WatchTarget,
    title: String,
    poster_path: Option<String>,
    ingestor: ProgressIngestor,
    throttle: ProgressThrottle,
    resume: Option<WatchProgressRecord>,
    view: Option<ContinueWatchingView>,
}

impl PlaybackSession {
    /// Opens a session and looks up where the user left off.
    pub async fn start(
        resolver: &ContinueWatchingResolver,
        ingestor: ProgressIngestor,
        user: Option<UserId>,
        target: WatchTarget,
        title: impl Into<String>,
        poster_path: Option<String>,
    ) -> Self {
        let resume = resolver.resume_point(user.as_ref(), target).await;
        if let Some(record) = &resume {
            debug!(content = %target, position = record.current_time_secs, "resuming playback");
        }
        Self {
            user,
            target,
            title: title.into(),
            poster_path,
            ingestor,
            throttle: ProgressThrottle::new(resolver.config().sample_interval_secs),
            resume,
            view: None,
        }
    }

    /// Invalidate `view` after every saved sample.
    pub fn with_view(mut self, view: ContinueWatchingView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    pub fn resume_record(&self) -> Option<&WatchProgressRecord> {
        self.resume.as_ref()
    }

    /// Saved playback position, if any.
    pub fn resume_at_secs(&self) -> Option<f64> {
        self.resume
            .as_ref()
            .map(|record| record.current_time_secs)
            .filter(|secs| *secs > 0.0)
    }

    pub fn embed_options(&self) -> EmbedOptions {
        EmbedOptions {
            resume_at_secs: self.resume_at_secs().map(|secs| secs.floor() as u64),
            episode_controls: self.target.content_type().is_series(),
        }
    }

    pub async fn handle_event(&mut self, event: &PlayerEvent) -> Result<SessionOutcome> {
        if !event.is_time_update() {
            return Ok(SessionOutcome::Ignored);
        }
        let content = match event.content() {
            Ok(content) if content == self.target.content() => content,
            _ => {
                debug!(
                    session = %self.target,
                    id = %event.id,
                    media_type = %event.media_type,
                    season = ?event.season,
                    episode = ?event.episode,
                    "ignoring event for other content"
                );
                return Ok(SessionOutcome::Ignored);
            }
        };
        // Season and episode are optional on player events.
        let reported = WatchTarget::new(
            content,
            event.season.or(self.target.season_number()),
            event.episode.or(self.target.episode_number()),
        );
        if reported != self.target {
            self.advance_to(reported);
        }
        if !self.throttle.should_emit(event.current_time) {
            return Ok(SessionOutcome::Throttled);
        }

        let update = ProgressUpdate {
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            progress_percent: event.progress,
            current_time_secs: event.current_time,
            duration_secs: event.duration,
        };
        let record = self
            .ingestor
            .report_progress(self.user.as_ref(), self.target, update)
            .await?;
        if let Some(view) = &self.view {
            view.invalidate().await;
        }
        Ok(SessionOutcome::Saved(record))
    }

    /// The player moved on to another episode of the same series.
    fn advance_to(&mut self, target: WatchTarget) {
        debug!(from = %self.target, to = %target, "player advanced to another episode");
        self.target = target;
        self.throttle.reset();
        self.resume = None;
    }

    /// Raw `postMessage` payload. Malformed messages are logged and ignored.
    pub async fn handle_message(&mut self, raw: &str) -> Result<SessionOutcome> {
        match parse_player_message(raw) {
            Ok(Some(event)) => self.handle_event(&event).await,
            Ok(None) => Ok(SessionOutcome::Ignored),
            Err(err) => {
                warn!(error = %err, "dropping malformed player message");
                Ok(SessionOutcome::Ignored)
            }
        }
    }
}
