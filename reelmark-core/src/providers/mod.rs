pub mod tmdb;
pub mod traits;

pub use tmdb::TmdbClient;
pub use traits::{ProviderError, RecommendationSource};
