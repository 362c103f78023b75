use reelmark_model::ModelError;
use thiserror::Error;

/// Failures raised by a store adapter.
#[derive(Error, Debug)]
pub enum PersistError {
    /// The store refused the caller. Read paths treat this as "not signed in
    /// yet" rather than a hard failure.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Backend(String),

    /// A stored document could not be mapped back into the model.
    #[error("Corrupt record {document_id}: {reason}")]
    Corrupt { document_id: String, reason: String },
}

impl PersistError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, PersistError::PermissionDenied(_))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for PersistError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some("42501") =>
            {
                PersistError::PermissionDenied(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_) => PersistError::Unavailable(err.to_string()),
            _ => PersistError::Backend(err.to_string()),
        }
    }
}

pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Errors surfaced by the watch-state write paths.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("No signed-in user")]
    Unauthenticated,

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, WatchError>;
