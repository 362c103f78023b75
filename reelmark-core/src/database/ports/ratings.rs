use async_trait::async_trait;
use reelmark_model::{ContentKey, UserRating};

use crate::error::PersistResult;

#[async_trait]
pub trait RatingsRepository: Send + Sync {
    async fn get_rating(
        &self,
        key: &ContentKey,
    ) -> PersistResult<Option<UserRating>>;

    /// Creates the rating or replaces its value. `created_at` survives
    /// replacements; `updated_at` always moves.
    async fn upsert_rating(
        &self,
        key: &ContentKey,
        rating: u8,
    ) -> PersistResult<UserRating>;
}
