//! Decoding of `postMessage` payloads sent by the player iframe.

use reelmark_model::PlayerEvent;
use serde::Deserialize;
use thiserror::Error;

const PLAYER_EVENT: &str = "PLAYER_EVENT";

#[derive(Debug, Error)]
pub enum PlayerMessageError {
    #[error("Malformed player message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("PLAYER_EVENT message without data")]
    MissingData,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Parses one raw message. Messages that are not player events come back as
/// `Ok(None)`; the page receives plenty of unrelated traffic.
pub fn parse_player_message(raw: &str) -> Result<Option<PlayerEvent>, PlayerMessageError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.kind.as_deref() != Some(PLAYER_EVENT) {
        return Ok(None);
    }
    let data = envelope.data.ok_or(PlayerMessageError::MissingData)?;
    Ok(Some(serde_json::from_value(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelmark_model::{PlayerEventKind, WatchTarget};

    #[test]
    fn parses_player_event_envelope() {
        let raw = r#"{"type":"PLAYER_EVENT","data":{"event":"timeupdate",
            "currentTime":2520,"duration":6000,"progress":42,"id":"10",
            "mediaType":"movie","timestamp":1700000000000}}"#;
        let event = parse_player_message(raw).unwrap().unwrap();
        assert_eq!(event.event, PlayerEventKind::TimeUpdate);
        assert_eq!(event.target().unwrap(), WatchTarget::movie(10));
        assert_eq!(event.current_time, 2520.0);
    }

    #[test]
    fn ignores_other_message_types() {
        assert!(parse_player_message(r#"{"type":"READY"}"#).unwrap().is_none());
        assert!(parse_player_message(r#"{"hello":"world"}"#).unwrap().is_none());
    }

    #[test]
    fn reports_malformed_messages() {
        assert!(matches!(
            parse_player_message("not json"),
            Err(PlayerMessageError::Malformed(_))
        ));
        assert!(matches!(
            parse_player_message(r#"{"type":"PLAYER_EVENT"}"#),
            Err(PlayerMessageError::MissingData)
        ));
        assert!(matches!(
            parse_player_message(r#"{"type":"PLAYER_EVENT","data":{"event":"warp"}}"#),
            Err(PlayerMessageError::Malformed(_))
        ));
    }
}
