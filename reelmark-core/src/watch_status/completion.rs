use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use reelmark_model::{
    CompletedEntry, ContentRef, ContentSummary, ContentTypeFilter,
    RecommendationSection, WatchProgressRecord,
};
use tracing::{info, warn};

use super::{ProgressThresholds, is_placeholder_title};
use crate::config::WatchConfig;
use crate::providers::RecommendationSource;

/// Completed titles, most recently watched first, one per content identity.
///
/// Episodes of the same series collapse into a single entry for the series.
pub fn derive_completions(
    records: &[WatchProgressRecord],
    thresholds: &ProgressThresholds,
    filter: ContentTypeFilter,
    limit: usize,
) -> Vec<CompletedEntry> {
    let mut completed: Vec<&WatchProgressRecord> = records
        .iter()
        .filter(|record| filter.matches(record.target().content_type()))
        .filter(|record| thresholds.is_completed(record.progress_percent))
        .filter(|record| !is_placeholder_title(&record.title))
        .collect();
    // Stable: records sharing a timestamp keep snapshot order.
    completed.sort_by(|a, b| b.last_watched_at.cmp(&a.last_watched_at));

    let mut seen = HashSet::new();
    completed
        .into_iter()
        .filter(|record| seen.insert(record.content()))
        .take(limit)
        .map(|record| CompletedEntry {
            content: record.content(),
            title: record.title.clone(),
            last_watched_at: record.last_watched_at,
        })
        .collect()
}

/// Drops every item whose identity was already seen, keeping the first
/// occurrence and the original order.
pub fn dedup_by_identity<T>(
    items: impl IntoIterator<Item = T>,
    identity: impl Fn(&T) -> ContentRef,
) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(identity(item)))
        .collect()
}

pub fn section_heading(title: &str) -> String {
    format!("Since You Watched {title}")
}

/// Turns completed titles into "Since You Watched" rows using the catalog's
/// recommendations.
#[derive(Clone)]
pub struct RecommendationTrigger {
    source: Arc<dyn RecommendationSource>,
    config: WatchConfig,
}

impl std::fmt::Debug for RecommendationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationTrigger")
            .field("source", &std::any::type_name_of_val(self.source.as_ref()))
            .field("config", &self.config)
            .finish()
    }
}

impl RecommendationTrigger {
    pub fn new(source: Arc<dyn RecommendationSource>, config: WatchConfig) -> Self {
        Self { source, config }
    }

    /// Completions from a history snapshot, capped at the configured number
    /// of sections.
    pub fn completions(
        &self,
        history: &[WatchProgressRecord],
        filter: ContentTypeFilter,
    ) -> Vec<CompletedEntry> {
        let completions = derive_completions(
            history,
            &self.config.thresholds(),
            filter,
            self.config.completion_sections,
        );
        if !completions.is_empty() {
            info!(count = completions.len(), "completed titles seed recommendations");
        }
        completions
    }

    /// Fetches one row per completion. Fetches run concurrently and a
    /// failed fetch only drops its own row. Rows keep the order of
    /// `completions`; rows with nothing left to show are omitted.
    pub async fn sections(
        &self,
        completions: &[CompletedEntry],
    ) -> Vec<RecommendationSection> {
        let per_section = self.config.recommendations_per_section;
        let fetches = completions.iter().map(|completed| async move {
            match self.source.fetch_recommendations(completed.content, 1).await {
                Ok(page) => {
                    let mut results = page.results;
                    results.truncate(per_section);
                    Some((completed, dedup_by_identity(results, |item| item.content)))
                }
                Err(err) => {
                    warn!(
                        content = %completed.content,
                        error = %err,
                        "recommendation fetch failed; skipping section"
                    );
                    None
                }
            }
        });

        let mut shown: HashSet<ContentRef> = HashSet::new();
        let mut sections = Vec::new();
        for (completed, items) in join_all(fetches).await.into_iter().flatten() {
            let items: Vec<ContentSummary> = if self.config.dedupe_across_sections {
                items
                    .into_iter()
                    .filter(|item| shown.insert(item.content))
                    .collect()
            } else {
                items
            };
            if items.is_empty() {
                continue;
            }
            sections.push(RecommendationSection {
                source: completed.clone(),
                heading: section_heading(&completed.title),
                items,
            });
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reelmark_model::{ProgressKey, UserId, WatchTarget};

    fn record(
        target: WatchTarget,
        title: &str,
        percent: f64,
        minute: u32,
    ) -> WatchProgressRecord {
        WatchProgressRecord {
            key: ProgressKey::new(UserId::new("u1").unwrap(), target),
            title: title.into(),
            poster_path: None,
            current_time_secs: 0.0,
            duration_secs: 100.0,
            progress_percent: percent,
            last_watched_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn completions_are_unique_recent_first_and_capped() {
        let records = vec![
            record(WatchTarget::movie(1), "Heat", 95.0, 1),
            record(WatchTarget::movie(2), "Alien", 94.99, 9),
            record(WatchTarget::episode(3, 1, 1), "Dark", 99.0, 2),
            record(WatchTarget::episode(3, 1, 2), "Dark", 100.0, 8),
            record(WatchTarget::movie(4), "tv", 100.0, 7),
            record(WatchTarget::movie(5), "Jaws", 97.0, 5),
            record(WatchTarget::movie(6), "Ronin", 97.0, 0),
        ];

        let completions = derive_completions(
            &records,
            &ProgressThresholds::default(),
            ContentTypeFilter::All,
            3,
        );
        let titles: Vec<&str> = completions.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Dark", "Jaws", "Heat"]);
        assert_eq!(completions[0].content, ContentRef::series(3));
    }

    #[test]
    fn completions_respect_media_filter() {
        let records = vec![
            record(WatchTarget::movie(1), "Heat", 100.0, 1),
            record(WatchTarget::episode(3, 1, 1), "Dark", 100.0, 2),
        ];
        let movies = derive_completions(
            &records,
            &ProgressThresholds::default(),
            ContentTypeFilter::Movie,
            3,
        );
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].content, ContentRef::movie(1));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let items = vec![
            (ContentRef::movie(1), "first"),
            (ContentRef::series(1), "series"),
            (ContentRef::movie(1), "second"),
            (ContentRef::movie(2), "other"),
        ];
        let kept = dedup_by_identity(items, |(content, _)| *content);
        let labels: Vec<&str> = kept.iter().map(|(_, label)| *label).collect();
        assert_eq!(labels, vec!["first", "series", "other"]);
    }
}
