//! ArtBridge Server Library
//!
//! Artist registration with moderation and member-name synchronization.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod name_sync;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use name_sync::{NameSyncRuntime, SyncReport};
pub use services::{
    ArtistService, AuthService, DeleteOutcome, ModerationQueryService, TransitionOutcome,
};
pub use state::AppState;
