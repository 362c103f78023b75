use chrono::{DateTime, Utc};

use crate::watch::ContentKey;

/// Lowest accepted user rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted user rating
pub const MAX_RATING: u8 = 10;

/// A user's own 1-10 score for a title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserRating {
    pub key: ContentKey,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn is_valid_rating(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
