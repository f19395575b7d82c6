//! ArtBridge Core
//!
//! Domain types, traits, and error handling for the ArtBridge artist service.
//!
//! This crate provides the building blocks shared by the storage layer, the
//! member-name synchronization tasks, and the service binary.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Artist`, `Owner`, `ArtistStatus`, `Actor`, paging and event payloads
//! - **Lifecycle**: `StatusTransitionEngine`, the only place an artist status is decided
//! - **Core Traits**: `ArtistStore`, `Publisher`, `Subscriber`, `IdentityProvider`
//! - **Error Handling**: Unified `ArtistError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use artbridge_core::lifecycle::{Action, StatusTransitionEngine};
//! use artbridge_core::types::{Actor, ArtistStatus, Privilege};
//!
//! let moderator = Actor::new(1, "admin", Privilege::Moderator);
//! let next = StatusTransitionEngine::next_status(
//!     ArtistStatus::UploadPending,
//!     Action::Approve,
//!     &moderator,
//!     7,
//! )
//! .unwrap();
//! assert_eq!(next, Some(ArtistStatus::Ok));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod lifecycle;
pub mod messaging;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ArtistError, Result};
pub use lifecycle::{Action, StatusTransitionEngine};
pub use messaging::{Message, Publisher, Subscriber};
pub use store::{ArtistStore, NewArtist};
pub use traits::IdentityProvider;

pub use types::{
    Actor, Artist, ArtistId, ArtistPatch, ArtistProfile, ArtistStatus, CreateArtist,
    IdentityChangeEvent, NameRequestEvent, Owner, OwnerId, Page, PageRequest, Privilege,
};
