//! Member-name synchronization
//!
//! Keeps the owner display name embedded in artist records in step with the
//! identity service:
//!
//! - [`NameSyncProducer`] asks the identity service for a member's name when
//!   an artist is created (fire-and-forget, at most once)
//! - [`NameSyncConsumer`] listens for identity changes and overwrites the
//!   name on every artist owned by that member
//! - [`LineSubscriber`]/[`LinePublisher`] carry both topics over
//!   line-delimited streams, so the identity service can sit on the other
//!   end of a pipe
//! - [`InMemoryBroker`] is an in-process topic channel for embedding both
//!   ends in one process
//!
//! The two halves share nothing but the channel; the consumer may apply an
//! update seconds, minutes, or never after the matching request.

mod broker;
mod consumer;
mod error;
mod lines;
mod producer;

// Public exports
pub use broker::{BrokerSubscription, InMemoryBroker};
pub use consumer::{ConsumerStats, MalformedEventPolicy, NameSyncConsumer};
pub use error::{Result, SyncError};
pub use lines::{Envelope, LinePublisher, LineSubscriber};
pub use producer::{NameSyncHandle, NameSyncProducer, ProducerStats};

/// Topic carrying outbound name requests
pub const NAME_REQUEST_TOPIC: &str = "member-name-request";

/// Topic carrying inbound identity changes
pub const NAME_UPDATE_TOPIC: &str = "member-name";

/// Topic receiving identity-change payloads that could not be parsed
pub const DEAD_LETTER_TOPIC: &str = "member-name-dlq";
