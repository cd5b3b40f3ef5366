//! Error types shared by the indexing and query paths.

use thiserror::Error;

/// User-facing text returned when a query arrives without a phrase.
pub const MISSING_PHRASE_MESSAGE: &str = "phrase parameter not exists";

#[derive(Error, Debug)]
pub enum IndexError {
    /// A required request parameter was absent or empty.
    #[error("{0} parameter not exists")]
    MissingParameter(&'static str),

    /// The storage collaborator could not serve the call.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Storage failures are transient from the scheduler's point of view.
    pub fn is_retriable(&self) -> bool {
        matches!(self, IndexError::StorageUnavailable(_))
    }
}
