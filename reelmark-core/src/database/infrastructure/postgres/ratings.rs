use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelmark_model::{ContentKey, UserRating};
use sqlx::{FromRow, PgPool};

use super::{corrupt, decode_content, decode_user, encode_content_id};
use crate::database::document_id::content_document_id;
use crate::database::ports::RatingsRepository;
use crate::error::{PersistError, PersistResult};

#[derive(Debug, FromRow)]
struct RatingRow {
    document_id: String,
    user_id: String,
    content_type: String,
    content_id: i64,
    rating: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for UserRating {
    type Error = PersistError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let id = row.document_id.as_str();
        let content = decode_content(id, &row.content_type, row.content_id)?;
        let rating = u8::try_from(row.rating)
            .map_err(|_| corrupt(id, format!("rating {}", row.rating)))?;
        Ok(UserRating {
            key: ContentKey::new(decode_user(id, row.user_id)?, content),
            rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PostgresRatingsRepository {
    pool: PgPool,
}

impl PostgresRatingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RatingsRepository for PostgresRatingsRepository {
    async fn get_rating(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<UserRating>> {
        let row = sqlx::query_as::<_, RatingRow>(
            r#"
            SELECT document_id, user_id, content_type, content_id, rating,
                   created_at, updated_at
            FROM user_ratings
            WHERE document_id = $1
            "#,
        )
        .bind(content_document_id(key))
        .fetch_optional(self.pool())
        .await?;
        row.map(UserRating::try_from).transpose()
    }

    async fn upsert_rating(
        &self,
        key: &ContentKey,
        rating: u8,
    ) -> PersistResult<UserRating> {
        let row = sqlx::query_as::<_, RatingRow>(
            r#"
            INSERT INTO user_ratings (
                document_id, user_id, content_type, content_id, rating,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, now(), now())
            ON CONFLICT (document_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                updated_at = EXCLUDED.updated_at
            RETURNING
                document_id, user_id, content_type, content_id, rating,
                created_at, updated_at
            "#,
        )
        .bind(content_document_id(key))
        .bind(key.user_id.as_str())
        .bind(key.content.content_type.as_str())
        .bind(encode_content_id(key.content)?)
        .bind(i16::from(rating))
        .fetch_one(self.pool())
        .await?;

        UserRating::try_from(row)
    }
}
