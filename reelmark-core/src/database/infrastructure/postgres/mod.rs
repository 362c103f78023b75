//! Postgres adapters. Timestamps come from the database clock (`now()`).

mod ratings;
mod watch_progress;
mod watchlist;

pub use ratings::PostgresRatingsRepository;
pub use watch_progress::PostgresWatchProgressRepository;
pub use watchlist::PostgresWatchlistRepository;

use reelmark_model::{ContentId, ContentRef, ContentType, UserId};
use sqlx::{Postgres, QueryBuilder};

use crate::database::ports::{FilterValue, RecordQuery, SortOrder};
use crate::error::PersistError;

/// Appends ` AND col op $n` for each filter, the ordering and the limit.
///
/// Ties on the sort column fall back to `document_id` so pages come back in
/// the same order as the in-memory store.
fn push_record_query<F: Copy>(
    builder: &mut QueryBuilder<'_, Postgres>,
    query: &RecordQuery<F>,
    column: impl Fn(F) -> &'static str,
) {
    for filter in &query.filters {
        builder.push(" AND ");
        builder.push(column(filter.field));
        builder.push(" ");
        builder.push(filter.op.as_sql());
        builder.push(" ");
        match &filter.value {
            FilterValue::Number(value) => builder.push_bind(*value),
            FilterValue::Integer(value) => builder.push_bind(*value),
            FilterValue::Text(value) => builder.push_bind(value.clone()),
            FilterValue::Timestamp(value) => builder.push_bind(*value),
        };
    }

    builder.push(" ORDER BY ");
    if let Some(order_by) = query.order_by {
        builder.push(column(order_by.field));
        builder.push(match order_by.order {
            SortOrder::Ascending => " ASC, ",
            SortOrder::Descending => " DESC, ",
        });
    }
    builder.push("document_id ASC");

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
}

fn corrupt(document_id: &str, reason: impl ToString) -> PersistError {
    PersistError::Corrupt {
        document_id: document_id.to_string(),
        reason: reason.to_string(),
    }
}

fn decode_user(document_id: &str, raw: String) -> Result<UserId, PersistError> {
    UserId::new(raw).map_err(|e| corrupt(document_id, e))
}

fn decode_content(
    document_id: &str,
    content_type: &str,
    content_id: i64,
) -> Result<ContentRef, PersistError> {
    let content_type: ContentType =
        content_type.parse().map_err(|e| corrupt(document_id, e))?;
    let content_id = u64::try_from(content_id)
        .map_err(|_| corrupt(document_id, "negative content id"))?;
    Ok(ContentRef::new(content_type, ContentId::new(content_id)))
}

fn encode_content_id(content: ContentRef) -> Result<i64, PersistError> {
    i64::try_from(content.content_id.get()).map_err(|_| {
        PersistError::Backend(format!(
            "content id {} does not fit a BIGINT column",
            content.content_id
        ))
    })
}
