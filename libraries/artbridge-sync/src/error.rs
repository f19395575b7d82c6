use artbridge_core::ArtistError;
use thiserror::Error;

/// Errors that can occur in the synchronization tasks
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Artist(#[from] ArtistError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for SyncError {
    fn from(err: tokio::task::JoinError) -> Self {
        SyncError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
