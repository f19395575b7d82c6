//! Publish/subscribe seam between this service and the identity service
//!
//! The traits describe an at-most-once topic channel. Nothing here assumes a
//! particular broker; `artbridge-sync` ships an in-process implementation.

use async_trait::async_trait;

use crate::error::Result;

/// A raw message received from a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: String,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Sends payloads to a named topic
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Hand `payload` to the channel for `topic`
    ///
    /// # Errors
    /// Returns [`crate::ArtistError::Delivery`] when the channel refuses the message
    async fn publish(&self, topic: &str, payload: String) -> Result<()>;
}

/// Receives payloads from one topic
#[async_trait]
pub trait Subscriber: Send {
    /// Topic this subscription listens on
    fn topic(&self) -> &str;

    /// Wait for the next message; `None` once the channel is closed for good
    async fn next_message(&mut self) -> Option<Message>;
}
