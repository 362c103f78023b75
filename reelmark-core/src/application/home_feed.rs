use std::sync::Arc;

use reelmark_model::{
    ContentTypeFilter, RecommendationSection, UserId, WatchProgressRecord,
};

use super::unit_of_work::WatchUnitOfWork;
use crate::config::WatchConfig;
use crate::providers::RecommendationSource;
use crate::watch_status::{
    ContinueWatchingResolver, RecommendationTrigger, select_continue_watching,
};

/// Personal rows of the home screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSections {
    pub continue_watching: Vec<WatchProgressRecord>,
    pub recommendations: Vec<RecommendationSection>,
}

/// Builds the continue-watching row and the "Since You Watched" rows from a
/// single history read.
#[derive(Debug, Clone)]
pub struct HomeFeed {
    resolver: ContinueWatchingResolver,
    trigger: RecommendationTrigger,
}

impl HomeFeed {
    pub fn new(
        uow: &WatchUnitOfWork,
        source: Arc<dyn RecommendationSource>,
        config: WatchConfig,
    ) -> Self {
        Self {
            resolver: uow.resolver(config.clone()),
            trigger: RecommendationTrigger::new(source, config),
        }
    }

    /// Anonymous users get empty rows.
    pub async fn load(
        &self,
        user: Option<&UserId>,
        filter: ContentTypeFilter,
    ) -> HomeSections {
        let Some(user) = user else {
            return HomeSections::default();
        };
        let config = self.resolver.config();
        let history = self.resolver.history(user).await;

        let completions = self.trigger.completions(&history, filter);
        let recommendations = self.trigger.sections(&completions).await;
        let continue_watching = select_continue_watching(
            history,
            &config.thresholds(),
            filter,
            config.continue_watching_limit,
        );

        HomeSections {
            continue_watching,
            recommendations,
        }
    }
}
