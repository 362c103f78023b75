//! Events posted by the embedded player.

use crate::content_type::ContentType;
use crate::error::ModelError;
use crate::ids::ContentId;
use crate::watch::{ContentRef, WatchTarget};

/// Player lifecycle notifications. Only `timeupdate` drives persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlayerEventKind {
    TimeUpdate,
    Play,
    Pause,
    Ended,
    Seeked,
}

/// Payload of a `PLAYER_EVENT` message.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlayerEvent {
    pub event: PlayerEventKind,
    pub current_time: f64,
    pub duration: f64,
    /// Percent watched as computed by the player, 0-100
    pub progress: f64,
    /// Catalog id, sent as a string by the player
    pub id: String,
    pub media_type: ContentType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub season: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub episode: Option<u16>,
    /// Player clock in milliseconds
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: i64,
}

impl PlayerEvent {
    pub fn is_time_update(&self) -> bool {
        self.event == PlayerEventKind::TimeUpdate
    }

    /// The catalog entry this event reports on, whatever the episode.
    pub fn content(&self) -> Result<ContentRef, ModelError> {
        let id: ContentId = self.id.parse()?;
        Ok(ContentRef::new(self.media_type, id))
    }

    /// The target this event reports on. Series events without season or
    /// episode resolve to the first episode.
    pub fn target(&self) -> Result<WatchTarget, ModelError> {
        Ok(WatchTarget::new(self.content()?, self.season, self.episode))
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn decodes_player_payload() {
        let raw = r#"{
            "event": "timeupdate",
            "currentTime": 120.5,
            "duration": 2400,
            "progress": 5.02,
            "id": "1399",
            "mediaType": "tv",
            "season": 1,
            "episode": 2,
            "timestamp": 1700000000000
        }"#;
        let event: PlayerEvent = serde_json::from_str(raw).unwrap();
        assert!(event.is_time_update());
        assert_eq!(event.target().unwrap(), WatchTarget::episode(1399, 1, 2));
    }

    #[test]
    fn movie_payload_without_episode_fields() {
        let raw = r#"{"event":"pause","currentTime":10,"duration":100,
            "progress":10,"id":"10","mediaType":"movie"}"#;
        let event: PlayerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event, PlayerEventKind::Pause);
        assert_eq!(event.target().unwrap(), WatchTarget::movie(10));
    }
}
