//! Glue between the embedded player and the progress engine.

pub mod embed;
pub mod message;
pub mod session;

pub use embed::{EmbedOptions, embed_url};
pub use message::{PlayerMessageError, parse_player_message};
pub use session::{PlaybackSession, SessionOutcome};
