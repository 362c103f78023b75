//! Field filters, ordering and limits understood by every adapter.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use reelmark_model::{WatchProgressRecord, WatchlistRecord};

/// Sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Comparison applied by a [`FieldFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl FilterOp {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FilterValue {
    /// Values of different kinds never compare.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (FilterValue::Number(a), FilterValue::Number(b)) => a.partial_cmp(b),
            (FilterValue::Integer(a), FilterValue::Integer(b)) => Some(a.cmp(b)),
            (FilterValue::Text(a), FilterValue::Text(b)) => Some(a.cmp(b)),
            (FilterValue::Timestamp(a), FilterValue::Timestamp(b)) => {
                Some(a.cmp(b))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter<F> {
    pub field: F,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<F> {
    pub field: F,
    pub order: SortOrder,
}

/// Query scoped to one user's records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery<F> {
    pub filters: Vec<FieldFilter<F>>,
    pub order_by: Option<OrderBy<F>>,
    pub limit: Option<usize>,
}

impl<F> Default for RecordQuery<F> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }
}

impl<F> RecordQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: F, op: FilterOp, value: FilterValue) -> Self {
        self.filters.push(FieldFilter { field, op, value });
        self
    }

    pub fn order_by(mut self, field: F, order: SortOrder) -> Self {
        self.order_by = Some(OrderBy { field, order });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<F: Copy> RecordQuery<F> {
    /// Applies filters, a stable sort and the limit to records already
    /// scoped to the user. Used by adapters without a query engine.
    pub fn apply<R>(&self, records: impl IntoIterator<Item = R>) -> Vec<R>
    where
        R: QueryableRecord<Field = F>,
    {
        let mut matched: Vec<R> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        if let Some(order_by) = self.order_by {
            matched.sort_by(|a, b| {
                let ordering = a
                    .field_value(order_by.field)
                    .compare(&b.field_value(order_by.field))
                    .unwrap_or(Ordering::Equal);
                match order_by.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }

    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: QueryableRecord<Field = F>,
    {
        self.filters.iter().all(|filter| {
            record
                .field_value(filter.field)
                .compare(&filter.value)
                .is_some_and(|ordering| filter.op.accepts(ordering))
        })
    }
}

/// Records that expose their fields to in-process query evaluation.
pub trait QueryableRecord {
    type Field: Copy;

    fn field_value(&self, field: Self::Field) -> FilterValue;
}

/// Queryable fields of a watch-progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressField {
    ContentType,
    ContentId,
    ProgressPercent,
    LastWatchedAt,
}

impl ProgressField {
    pub const fn column(&self) -> &'static str {
        match self {
            ProgressField::ContentType => "content_type",
            ProgressField::ContentId => "content_id",
            ProgressField::ProgressPercent => "progress_percent",
            ProgressField::LastWatchedAt => "last_watched_at",
        }
    }
}

impl QueryableRecord for WatchProgressRecord {
    type Field = ProgressField;

    fn field_value(&self, field: ProgressField) -> FilterValue {
        match field {
            ProgressField::ContentType => {
                FilterValue::Text(self.target().content_type().to_string())
            }
            ProgressField::ContentId => {
                FilterValue::Integer(self.target().content_id().get() as i64)
            }
            ProgressField::ProgressPercent => {
                FilterValue::Number(self.progress_percent)
            }
            ProgressField::LastWatchedAt => {
                FilterValue::Timestamp(self.last_watched_at)
            }
        }
    }
}

/// Queryable fields of a watchlist record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchlistField {
    ContentType,
    ContentId,
    AddedAt,
}

impl WatchlistField {
    pub const fn column(&self) -> &'static str {
        match self {
            WatchlistField::ContentType => "content_type",
            WatchlistField::ContentId => "content_id",
            WatchlistField::AddedAt => "added_at",
        }
    }
}

impl QueryableRecord for WatchlistRecord {
    type Field = WatchlistField;

    fn field_value(&self, field: WatchlistField) -> FilterValue {
        match field {
            WatchlistField::ContentType => {
                FilterValue::Text(self.key.content.content_type.to_string())
            }
            WatchlistField::ContentId => {
                FilterValue::Integer(self.key.content.content_id.get() as i64)
            }
            WatchlistField::AddedAt => FilterValue::Timestamp(self.added_at),
        }
    }
}
