//! Engine configuration.
//!
//! Every section is optional in the source file; missing keys fall back to
//! the defaults the home sections were tuned with.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::watch_status::ProgressThresholds;

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReelmarkConfig {
    pub watch: WatchConfig,
    pub tmdb: TmdbConfig,
    pub player: PlayerConfig,
    pub database: DatabaseConfig,
}

/// Thresholds and caps for the continue-watching and recommendation rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Records at or below this percent have barely been started and stay
    /// out of continue watching.
    pub in_progress_floor_percent: f64,
    /// Records at or above this percent count as completed.
    pub completion_percent: f64,
    /// Most recent records fetched per resolve.
    pub history_limit: usize,
    /// Entries shown in the continue-watching row.
    pub continue_watching_limit: usize,
    /// Completed titles that seed a "Since You Watched" row.
    pub completion_sections: usize,
    /// Catalog recommendations kept per row.
    pub recommendations_per_section: usize,
    /// Minimum playback distance between two persisted samples.
    pub sample_interval_secs: f64,
    /// Drop recommendations already shown by an earlier row.
    pub dedupe_across_sections: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            in_progress_floor_percent: 5.0,
            completion_percent: 95.0,
            history_limit: 50,
            continue_watching_limit: 20,
            completion_sections: 3,
            recommendations_per_section: 10,
            sample_interval_secs: 10.0,
            dedupe_across_sections: true,
        }
    }
}

impl WatchConfig {
    pub fn thresholds(&self) -> ProgressThresholds {
        ProgressThresholds {
            in_progress_floor: self.in_progress_floor_percent,
            completion: self.completion_percent,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    /// Read access token. Never written back out.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub language: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            access_token: None,
            language: None,
        }
    }
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("language", &self.language)
            .finish()
    }
}

/// Embedded player settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_url: String,
    pub accent_color: Option<String>,
    pub auto_play: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.vidking.net".to_string(),
            accent_color: Some("e50914".to_string()),
            auto_play: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

/// Guard-rail violations found by [`ReelmarkConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "in-progress floor ({floor}%) must be below the completion threshold ({completion}%)"
    )]
    ThresholdOrder { floor: f64, completion: f64 },

    #[error("completion threshold must be within 0-100%, got {0}")]
    CompletionOutOfRange(f64),

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("sample interval must be a positive number of seconds, got {0}")]
    SampleInterval(f64),

    #[error("invalid {field} url {value:?}: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ReelmarkConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$REELMARK_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$REELMARK_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found, then
    /// 4) defaults.
    ///
    /// `TMDB_ACCESS_TOKEN`, `DATABASE_URL` and `VIDKING_BASE_URL` override
    /// whatever the source provided.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        let (mut config, source) = Self::load_source()?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok((config, source))
    }

    fn load_source() -> anyhow::Result<(Self, ConfigSource)> {
        if let Ok(path_str) = env::var("REELMARK_CONFIG_PATH")
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var("REELMARK_CONFIG_JSON")
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .context("failed to parse REELMARK_CONFIG_JSON")?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid config {}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid config json: {err}"))
    }

    /// Applies secret and deployment overrides. `lookup` is normally
    /// `std::env::var`; tests pass a map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_blank("TMDB_ACCESS_TOKEN") {
            self.tmdb.access_token = Some(token);
        }
        if let Some(url) = non_blank("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(url) = non_blank("VIDKING_BASE_URL") {
            self.player.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let watch = &self.watch;
        if !(0.0..=100.0).contains(&watch.completion_percent) {
            return Err(ConfigError::CompletionOutOfRange(
                watch.completion_percent,
            ));
        }
        if !(watch.in_progress_floor_percent < watch.completion_percent) {
            return Err(ConfigError::ThresholdOrder {
                floor: watch.in_progress_floor_percent,
                completion: watch.completion_percent,
            });
        }
        for (name, value) in [
            ("history_limit", watch.history_limit),
            ("continue_watching_limit", watch.continue_watching_limit),
            ("completion_sections", watch.completion_sections),
            (
                "recommendations_per_section",
                watch.recommendations_per_section,
            ),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(name));
            }
        }
        if !(watch.sample_interval_secs.is_finite()
            && watch.sample_interval_secs > 0.0)
        {
            return Err(ConfigError::SampleInterval(watch.sample_interval_secs));
        }
        for (field, value) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
            ("player.base_url", &self.player.base_url),
        ] {
            Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                reason: err.to_string(),
            })?;
        }
        Ok(())
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "reelmark.toml",
            "reelmark.json",
            "config/reelmark.toml",
            "config/reelmark.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_validate() {
        let config = ReelmarkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.watch.history_limit, 50);
        assert_eq!(config.watch.continue_watching_limit, 20);
        assert_eq!(config.watch.completion_sections, 3);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ReelmarkConfig::parse_from_str(
            r#"
            [watch]
            continue_watching_limit = 12

            [player]
            accent_color = "00ff00"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.watch.continue_watching_limit, 12);
        assert_eq!(config.watch.completion_percent, 95.0);
        assert_eq!(config.player.accent_color.as_deref(), Some("00ff00"));
        assert!(config.player.auto_play);
    }

    #[test]
    fn json_is_accepted_as_fallback() {
        let config = ReelmarkConfig::parse_from_str(
            r#"{"watch": {"dedupe_across_sections": false}}"#,
            "inline",
        )
        .unwrap();
        assert!(!config.watch.dedupe_across_sections);
    }

    #[test]
    fn env_overrides_ignore_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TMDB_ACCESS_TOKEN", "secret"),
            ("DATABASE_URL", "  "),
        ]);
        let mut config = ReelmarkConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.tmdb.access_token.as_deref(), Some("secret"));
        assert_eq!(config.database.url, None);
        assert_eq!(config.player.base_url, "https://www.vidking.net");
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut config = ReelmarkConfig::default();
        config.watch.in_progress_floor_percent = 95.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdOrder {
                floor: 95.0,
                completion: 95.0
            })
        );
    }

    #[test]
    fn rejects_zero_limits_and_bad_urls() {
        let mut config = ReelmarkConfig::default();
        config.watch.history_limit = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLimit("history_limit"))
        );

        let mut config = ReelmarkConfig::default();
        config.player.base_url = "not a url".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl {
                field: "player.base_url",
                ..
            })
        ));
    }

    #[test]
    fn access_token_is_redacted_and_not_serialized() {
        let mut config = ReelmarkConfig::default();
        config.tmdb.access_token = Some("secret".into());
        assert!(!format!("{:?}", config.tmdb).contains("secret"));
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
