//! Player iframe URLs.

use reelmark_model::{ContentType, WatchTarget};
use url::Url;

use crate::config::PlayerConfig;

/// Per-playback knobs layered over [`PlayerConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedOptions {
    /// Resume position in whole seconds.
    pub resume_at_secs: Option<u64>,
    /// Show the next-episode button and episode picker (series only).
    pub episode_controls: bool,
}

/// `{base}/embed/movie/{id}` or `{base}/embed/tv/{id}/{season}/{episode}`
/// with the player's query parameters.
pub fn embed_url(
    config: &PlayerConfig,
    target: &WatchTarget,
    options: &EmbedOptions,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&config.base_url)?;
    let path = match target.content_type() {
        ContentType::Movie => format!("embed/movie/{}", target.content_id()),
        ContentType::Series => format!(
            "embed/tv/{}/{}/{}",
            target.content_id(),
            target.season_number().unwrap_or(1),
            target.episode_number().unwrap_or(1)
        ),
    };
    url = url.join(&format!("{}/", url.path().trim_end_matches('/')))?;
    url = url.join(&path)?;

    {
        let mut query = url.query_pairs_mut();
        if let Some(color) = config.accent_color.as_deref() {
            query.append_pair("color", color.trim_start_matches('#'));
        }
        query.append_pair("autoPlay", if config.auto_play { "true" } else { "false" });
        if target.content_type().is_series() && options.episode_controls {
            query.append_pair("nextEpisode", "true");
            query.append_pair("episodeSelector", "true");
        }
        if let Some(resume) = options.resume_at_secs.filter(|secs| *secs > 0) {
            query.append_pair("progress", &resume.to_string());
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_url_with_resume_point() {
        let url = embed_url(
            &PlayerConfig::default(),
            &WatchTarget::movie(10),
            &EmbedOptions {
                resume_at_secs: Some(2520),
                episode_controls: true,
            },
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.vidking.net/embed/movie/10?color=e50914&autoPlay=true&progress=2520"
        );
    }

    #[test]
    fn series_url_with_episode_controls() {
        let config = PlayerConfig {
            base_url: "https://player.example/base/".into(),
            accent_color: Some("#00ff00".into()),
            auto_play: false,
        };
        let url = embed_url(
            &config,
            &WatchTarget::episode(1399, 2, 5),
            &EmbedOptions {
                resume_at_secs: Some(0),
                episode_controls: true,
            },
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://player.example/base/embed/tv/1399/2/5?color=00ff00&autoPlay=false&nextEpisode=true&episodeSelector=true"
        );
    }

    #[test]
    fn rejects_unparsable_base() {
        let config = PlayerConfig {
            base_url: "not a url".into(),
            ..PlayerConfig::default()
        };
        assert!(embed_url(&config, &WatchTarget::movie(1), &EmbedOptions::default()).is_err());
    }
}
