use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "database")]
use anyhow::Context;
#[cfg(feature = "database")]
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::clock::Clock;
#[cfg(feature = "database")]
use crate::config::DatabaseConfig;
use crate::config::WatchConfig;
#[cfg(feature = "database")]
use crate::database::infrastructure::postgres::{
    PostgresRatingsRepository, PostgresWatchProgressRepository,
    PostgresWatchlistRepository,
};
use crate::database::infrastructure::memory::MemoryWatchStore;
use crate::database::ports::{
    RatingsRepository, WatchProgressRepository, WatchlistRepository,
};
use crate::ratings::RatingsTracker;
use crate::watch_status::{ContinueWatchingResolver, ProgressIngestor};
use crate::watchlist::WatchlistTracker;

/// Aggregates the repository ports the watch-state services run on.
#[derive(Clone)]
pub struct WatchUnitOfWork {
    pub progress: Arc<dyn WatchProgressRepository>,
    pub watchlist: Arc<dyn WatchlistRepository>,
    pub ratings: Arc<dyn RatingsRepository>,
}

impl fmt::Debug for WatchUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchUnitOfWork")
            .field("progress", &type_name_of_val(self.progress.as_ref()))
            .field("watchlist", &type_name_of_val(self.watchlist.as_ref()))
            .field("ratings", &type_name_of_val(self.ratings.as_ref()))
            .finish()
    }
}

impl WatchUnitOfWork {
    pub fn in_memory() -> Self {
        Self::from_memory(MemoryWatchStore::new())
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_memory(MemoryWatchStore::with_clock(clock))
    }

    /// Every port backed by the same store, so tests can keep a handle on it.
    pub fn from_memory(store: MemoryWatchStore) -> Self {
        let store = Arc::new(store);
        Self {
            progress: store.clone(),
            watchlist: store.clone(),
            ratings: store,
        }
    }

    #[cfg(feature = "database")]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            progress: Arc::new(PostgresWatchProgressRepository::new(pool.clone())),
            watchlist: Arc::new(PostgresWatchlistRepository::new(pool.clone())),
            ratings: Arc::new(PostgresRatingsRepository::new(pool)),
        }
    }

    /// Connects to `config.url` and applies pending migrations.
    #[cfg(feature = "database")]
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let url = config
            .url
            .as_deref()
            .context("database.url is not configured (set DATABASE_URL)")?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .context("failed to connect to Postgres")?;
        crate::MIGRATOR
            .run(&pool)
            .await
            .context("failed to run watch-state migrations")?;
        Ok(Self::postgres(pool))
    }

    pub fn ingestor(&self) -> ProgressIngestor {
        ProgressIngestor::new(self.progress.clone())
    }

    pub fn resolver(&self, config: WatchConfig) -> ContinueWatchingResolver {
        ContinueWatchingResolver::new(self.progress.clone(), config)
    }

    pub fn watchlist_tracker(&self) -> WatchlistTracker {
        WatchlistTracker::new(self.watchlist.clone())
    }

    pub fn ratings_tracker(&self) -> RatingsTracker {
        RatingsTracker::new(self.ratings.clone())
    }
}
