/// Server error types
use artbridge_core::ArtistError;
use artbridge_sync::SyncError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Artist(#[from] ArtistError),

    #[error("Synchronization error: {0}")]
    Sync(#[from] SyncError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<artbridge_storage::StorageError> for ServerError {
    fn from(err: artbridge_storage::StorageError) -> Self {
        ServerError::Artist(err.into())
    }
}
