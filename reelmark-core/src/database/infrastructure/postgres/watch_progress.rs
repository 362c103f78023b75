use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelmark_model::{
    ProgressKey, ProgressUpdate, UserId, WatchProgressRecord, WatchTarget,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{
    corrupt, decode_content, decode_user, encode_content_id, push_record_query,
};
use crate::database::document_id::progress_document_id;
use crate::database::ports::{
    ProgressField, RecordQuery, WatchProgressRepository,
};
use crate::error::{PersistError, PersistResult};

const SELECT_PROGRESS: &str = r#"
    SELECT
        document_id, user_id, content_type, content_id, season, episode,
        title, poster_path, current_time_secs, duration_secs,
        progress_percent, last_watched_at
    FROM watch_progress
"#;

#[derive(Debug, FromRow)]
struct ProgressRow {
    document_id: String,
    user_id: String,
    content_type: String,
    content_id: i64,
    season: Option<i32>,
    episode: Option<i32>,
    title: String,
    poster_path: Option<String>,
    current_time_secs: f64,
    duration_secs: f64,
    progress_percent: f64,
    last_watched_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for WatchProgressRecord {
    type Error = PersistError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        let id = row.document_id.as_str();
        let content = decode_content(id, &row.content_type, row.content_id)?;
        let season = row
            .season
            .map(u16::try_from)
            .transpose()
            .map_err(|_| corrupt(id, "season out of range"))?;
        let episode = row
            .episode
            .map(u16::try_from)
            .transpose()
            .map_err(|_| corrupt(id, "episode out of range"))?;

        Ok(WatchProgressRecord {
            key: ProgressKey::new(
                decode_user(id, row.user_id)?,
                WatchTarget::new(content, season, episode),
            ),
            title: row.title,
            poster_path: row.poster_path,
            current_time_secs: row.current_time_secs,
            duration_secs: row.duration_secs,
            progress_percent: row.progress_percent,
            last_watched_at: row.last_watched_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PostgresWatchProgressRepository {
    pool: PgPool,
}

impl PostgresWatchProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WatchProgressRepository for PostgresWatchProgressRepository {
    async fn get_progress(
        &self,
        key: &ProgressKey,
    ) -> PersistResult<Option<WatchProgressRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_PROGRESS);
        builder.push(" WHERE document_id = ");
        builder.push_bind(progress_document_id(key));

        let row = builder
            .build_query_as::<ProgressRow>()
            .fetch_optional(self.pool())
            .await?;
        row.map(WatchProgressRecord::try_from).transpose()
    }

    async fn upsert_progress(
        &self,
        key: &ProgressKey,
        update: &ProgressUpdate,
    ) -> PersistResult<WatchProgressRecord> {
        let target = key.target;
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO watch_progress (
                document_id, user_id, content_type, content_id, season, episode,
                title, poster_path, current_time_secs, duration_secs,
                progress_percent, last_watched_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
            ON CONFLICT (document_id) DO UPDATE SET
                title = EXCLUDED.title,
                poster_path = EXCLUDED.poster_path,
                current_time_secs = EXCLUDED.current_time_secs,
                duration_secs = EXCLUDED.duration_secs,
                progress_percent = EXCLUDED.progress_percent,
                last_watched_at = EXCLUDED.last_watched_at
            RETURNING
                document_id, user_id, content_type, content_id, season, episode,
                title, poster_path, current_time_secs, duration_secs,
                progress_percent, last_watched_at
            "#,
        )
        .bind(progress_document_id(key))
        .bind(key.user_id.as_str())
        .bind(target.content_type().as_str())
        .bind(encode_content_id(target.content())?)
        .bind(target.season_number().map(i32::from))
        .bind(target.episode_number().map(i32::from))
        .bind(&update.title)
        .bind(update.poster_path.as_deref())
        .bind(update.current_time_secs)
        .bind(update.duration_secs)
        .bind(update.progress_percent)
        .fetch_one(self.pool())
        .await?;

        WatchProgressRecord::try_from(row)
    }

    async fn query_progress(
        &self,
        user_id: &UserId,
        query: &RecordQuery<ProgressField>,
    ) -> PersistResult<Vec<WatchProgressRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_PROGRESS);
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id.as_str().to_string());
        push_record_query(&mut builder, query, |field| field.column());

        let rows = builder
            .build_query_as::<ProgressRow>()
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(WatchProgressRecord::try_from).collect()
    }

    async fn delete_progress(&self, key: &ProgressKey) -> PersistResult<()> {
        sqlx::query("DELETE FROM watch_progress WHERE document_id = $1")
            .bind(progress_document_id(key))
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
