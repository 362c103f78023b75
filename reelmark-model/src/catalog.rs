use crate::watch::{CompletedEntry, ContentRef};

/// Lightweight catalog listing entry (search, trending, recommendations).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentSummary {
    pub content: ContentRef,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f32>,
    /// Release date for movies, first air date for series
    pub release_date: Option<String>,
}

/// One page of a paginated catalog listing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn single(results: Vec<T>) -> Self {
        let total_results = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results,
        }
    }
}

/// "Since You Watched {title}" row seeded by a completed title.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendationSection {
    pub source: CompletedEntry,
    pub heading: String,
    pub items: Vec<ContentSummary>,
}
