use async_trait::async_trait;
use reelmark_model::{ContentRef, ContentSummary, Page};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Catalog collaborator that knows which titles relate to a given one.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch_recommendations(
        &self,
        content: ContentRef,
        page: u32,
    ) -> Result<Page<ContentSummary>, ProviderError>;
}
