//! TMDB v3 catalog client.

use async_trait::async_trait;
use reelmark_model::{
    ContentId, ContentRef, ContentSummary, ContentType, ImageSize, Page,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::traits::{ProviderError, RecommendationSource};
use crate::config::TmdbConfig;

#[derive(Debug, Clone, Deserialize)]
struct TmdbPage<T> {
    page: u32,
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

/// Recommendation entry. Movies carry `title`/`release_date`, series carry
/// `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
struct TmdbListItem {
    id: u64,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
}

impl TmdbListItem {
    fn into_summary(self, fallback: ContentType) -> ContentSummary {
        let content_type = self
            .media_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(fallback);
        let (title, release_date) = match content_type {
            ContentType::Movie => (self.title.or(self.name), self.release_date),
            ContentType::Series => {
                (self.name.or(self.title), self.first_air_date)
            }
        };
        ContentSummary {
            content: ContentRef::new(content_type, ContentId::new(self.id)),
            title: title.unwrap_or_default(),
            overview: self.overview.filter(|o| !o.is_empty()),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            release_date: release_date.filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct PageQuery<'a> {
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    access_token: String,
    language: Option<String>,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_config(&TmdbConfig::default(), access_token)
    }

    /// Fails with [`ProviderError::InvalidApiKey`] when no token is
    /// configured.
    pub fn from_config(config: &TmdbConfig) -> Result<Self, ProviderError> {
        let token = config
            .access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ProviderError::InvalidApiKey)?;
        Ok(Self::with_config(config, token))
    }

    fn with_config(config: &TmdbConfig, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            language: config.language.clone(),
        }
    }

    /// Full image URL for a TMDB image path such as `/abc.jpg`.
    pub fn image_url(&self, size: impl Into<ImageSize>, path: &str) -> Option<String> {
        image_url(&self.image_base_url, size.into(), path)
    }

    async fn get_tmdb_json<Q, T>(&self, path: &str, query: &Q) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "TMDB request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| ProviderError::ParseError(e.to_string()));
        }

        #[derive(Debug, Deserialize)]
        struct TmdbErrorBody {
            #[serde(default)]
            status_message: Option<String>,
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| format!("TMDB request failed with status {status}"));

        Err(status_error(status.as_u16(), message))
    }
}

#[async_trait]
impl RecommendationSource for TmdbClient {
    async fn fetch_recommendations(
        &self,
        content: ContentRef,
        page: u32,
    ) -> Result<Page<ContentSummary>, ProviderError> {
        let path = format!(
            "/{}/{}/recommendations",
            content.content_type.as_str(),
            content.content_id
        );
        let query = PageQuery {
            page: page.max(1),
            language: self.language.as_deref(),
        };
        let raw: TmdbPage<TmdbListItem> = self.get_tmdb_json(&path, &query).await?;
        Ok(convert_page(raw, content.content_type))
    }
}

fn convert_page(raw: TmdbPage<TmdbListItem>, fallback: ContentType) -> Page<ContentSummary> {
    Page {
        page: raw.page,
        results: raw
            .results
            .into_iter()
            .map(|item| item.into_summary(fallback))
            .collect(),
        total_pages: raw.total_pages,
        total_results: raw.total_results,
    }
}

fn status_error(status: u16, message: String) -> ProviderError {
    match status {
        401 => ProviderError::InvalidApiKey,
        404 => ProviderError::NotFound,
        429 => ProviderError::RateLimited,
        _ => ProviderError::ApiError(message),
    }
}

/// `{base}/{size}{path}`; `None` for a blank path.
pub fn image_url(base: &str, size: ImageSize, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let base = base.trim_end_matches('/');
    let url = if path.starts_with('/') {
        format!("{base}/{size}{path}")
    } else {
        format!("{base}/{size}/{path}")
    };
    Url::parse(&url).ok().map(String::from)
}
