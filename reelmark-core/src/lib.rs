//! # Reelmark Core
//!
//! Watch-progress and continue-watching engine for Reelmark: turns player
//! progress events into one record per user and title, derives the
//! continue-watching row and "Since You Watched" recommendations from them,
//! and tracks watchlist membership and user ratings.
//!
//! ## Feature Flags
//!
//! - `database` (default): PostgreSQL adapters and embedded migrations
//!
//! ## Architecture
//!
//! - [`database`]: repository ports, document ids, in-memory and Postgres adapters
//! - [`watch_status`]: ingestion, sampling, continue watching, completions, view slots
//! - [`watchlist`] / [`ratings`]: per-title user state
//! - [`playback`]: player message parsing, embed URLs, playback sessions
//! - [`providers`]: catalog recommendations (TMDB)
//! - [`application`]: unit of work and the home feed
//! - [`config`]: configuration loading and validation
//!
//! ## Examples
//!
//! ```no_run
//! use reelmark_core::{
//!     application::WatchUnitOfWork,
//!     config::WatchConfig,
//!     model::{ContentTypeFilter, ProgressUpdate, UserId, WatchTarget},
//! };
//!
//! async fn track(user: UserId) -> Result<(), Box<dyn std::error::Error>> {
//!     let uow = WatchUnitOfWork::in_memory();
//!     let update = ProgressUpdate {
//!         title: "Heat".to_string(),
//!         poster_path: Some("/heat.jpg".to_string()),
//!         progress_percent: 42.0,
//!         current_time_secs: 2520.0,
//!         duration_secs: 6000.0,
//!     };
//!     uow.ingestor()
//!         .report_progress(Some(&user), WatchTarget::movie(949), update)
//!         .await?;
//!
//!     let row = uow
//!         .resolver(WatchConfig::default())
//!         .resolve_filtered(&user, ContentTypeFilter::Movie)
//!         .await;
//!     println!("{} titles to continue", row.len());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub use reelmark_model as model;

/// Use cases composed from the repository ports
pub mod application;

/// Time source for server-assigned timestamps
pub mod clock;

/// Configuration loading and validation
pub mod config;

/// Repository ports and adapters
pub mod database;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Error types and error handling utilities
pub mod error;

/// Player integration
pub mod playback;

/// External catalog providers (TMDB integration)
pub mod providers;

pub mod ratings;

/// Progress ingestion and derived rows
pub mod watch_status;

pub mod watchlist;

pub use error::{PersistError, Result, WatchError};
