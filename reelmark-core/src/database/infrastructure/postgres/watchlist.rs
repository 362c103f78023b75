use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelmark_model::{ContentKey, UserId, WatchlistEntry, WatchlistRecord};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{decode_content, decode_user, encode_content_id, push_record_query};
use crate::database::document_id::content_document_id;
use crate::database::ports::{RecordQuery, WatchlistField, WatchlistRepository};
use crate::error::{PersistError, PersistResult};

const SELECT_WATCHLIST: &str = r#"
    SELECT
        document_id, user_id, content_type, content_id, title, poster_path,
        backdrop_path, overview, rating, added_at
    FROM watchlist_items
"#;

#[derive(Debug, FromRow)]
struct WatchlistRow {
    document_id: String,
    user_id: String,
    content_type: String,
    content_id: i64,
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    rating: Option<f32>,
    added_at: DateTime<Utc>,
}

impl TryFrom<WatchlistRow> for WatchlistRecord {
    type Error = PersistError;

    fn try_from(row: WatchlistRow) -> Result<Self, Self::Error> {
        let id = row.document_id.as_str();
        let content = decode_content(id, &row.content_type, row.content_id)?;
        Ok(WatchlistRecord {
            key: ContentKey::new(decode_user(id, row.user_id)?, content),
            title: row.title,
            poster_path: row.poster_path,
            backdrop_path: row.backdrop_path,
            overview: row.overview,
            rating: row.rating,
            added_at: row.added_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PostgresWatchlistRepository {
    pool: PgPool,
}

impl PostgresWatchlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WatchlistRepository for PostgresWatchlistRepository {
    async fn get_entry(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<WatchlistRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_WATCHLIST);
        builder.push(" WHERE document_id = ");
        builder.push_bind(content_document_id(key));

        let row = builder
            .build_query_as::<WatchlistRow>()
            .fetch_optional(self.pool())
            .await?;
        row.map(WatchlistRecord::try_from).transpose()
    }

    async fn upsert_entry(
        &self,
        key: &ContentKey,
        entry: &WatchlistEntry,
    ) -> PersistResult<WatchlistRecord> {
        let row = sqlx::query_as::<_, WatchlistRow>(
            r#"
            INSERT INTO watchlist_items (
                document_id, user_id, content_type, content_id, title,
                poster_path, backdrop_path, overview, rating, added_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
            ON CONFLICT (document_id) DO UPDATE SET
                title = EXCLUDED.title,
                poster_path = EXCLUDED.poster_path,
                backdrop_path = EXCLUDED.backdrop_path,
                overview = EXCLUDED.overview,
                rating = EXCLUDED.rating,
                added_at = EXCLUDED.added_at
            RETURNING
                document_id, user_id, content_type, content_id, title,
                poster_path, backdrop_path, overview, rating, added_at
            "#,
        )
        .bind(content_document_id(key))
        .bind(key.user_id.as_str())
        .bind(key.content.content_type.as_str())
        .bind(encode_content_id(key.content)?)
        .bind(&entry.title)
        .bind(entry.poster_path.as_deref())
        .bind(entry.backdrop_path.as_deref())
        .bind(entry.overview.as_deref())
        .bind(entry.rating)
        .fetch_one(self.pool())
        .await?;

        WatchlistRecord::try_from(row)
    }

    async fn query_entries(
        &self,
        user_id: &UserId,
        query: &RecordQuery<WatchlistField>,
    ) -> PersistResult<Vec<WatchlistRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_WATCHLIST);
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id.as_str().to_string());
        push_record_query(&mut builder, query, |field| field.column());

        let rows = builder
            .build_query_as::<WatchlistRow>()
            .fetch_all(self.pool())
            .await?;
        rows.into_iter().map(WatchlistRecord::try_from).collect()
    }

    async fn delete_entry(&self, key: &ContentKey) -> PersistResult<()> {
        sqlx::query("DELETE FROM watchlist_items WHERE document_id = $1")
            .bind(content_document_id(key))
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
