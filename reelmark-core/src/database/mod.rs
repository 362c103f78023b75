//! Store ports and the adapters implementing them.
//!
//! Domain code only talks to the traits in [`ports`]; flat document ids and
//! SQL stay inside [`infrastructure`].

pub mod document_id;
pub mod infrastructure;
pub mod ports;

pub use infrastructure::memory::MemoryWatchStore;
#[cfg(feature = "database")]
pub use infrastructure::postgres::{
    PostgresRatingsRepository, PostgresWatchProgressRepository,
    PostgresWatchlistRepository,
};
