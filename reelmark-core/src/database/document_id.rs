//! Flat document ids for stores that key documents by a single string.
//!
//! The layout matches the documents written by the web client so
//! existing collections stay addressable.

use reelmark_model::{ContentKey, ProgressKey};

/// `{user}_{type}_{id}_{season}_{episode}`. Movies write 0 for both
/// numbers; series targets always carry real ones, so season 0 stays
/// distinct from a bare series.
pub fn progress_document_id(key: &ProgressKey) -> String {
    let target = &key.target;
    format!(
        "{}_{}_{}_{}_{}",
        key.user_id,
        target.content_type(),
        target.content_id(),
        target.season_number().unwrap_or(0),
        target.episode_number().unwrap_or(0),
    )
}

/// `{user}_{type}_{id}`
pub fn content_document_id(key: &ContentKey) -> String {
    format!(
        "{}_{}_{}",
        key.user_id, key.content.content_type, key.content.content_id
    )
}
