/// Server services
pub mod artists;
pub mod auth;
pub mod moderation;

pub use artists::{ArtistService, DeleteOutcome, TransitionOutcome};
pub use auth::AuthService;
pub use moderation::ModerationQueryService;
