use artbridge_core::{ArtistError, Message, Publisher, Subscriber};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// In-process topic channel
///
/// Each topic is a `broadcast` channel. Publishing to a topic nobody listens
/// on fails with [`ArtistError::Delivery`]; a slow subscriber that falls more
/// than `capacity` messages behind loses the oldest ones. Both match the
/// at-most-once contract of the name-sync pair.
#[derive(Debug)]
pub struct InMemoryBroker {
    topics: RwLock<HashMap<String, broadcast::Sender<String>>>,
    capacity: usize,
}

impl InMemoryBroker {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Start listening on `topic`; only messages published afterwards are seen
    pub async fn subscribe(&self, topic: &str) -> BrokerSubscription {
        let sender = self.sender(topic).await;
        debug!("New subscriber on topic {}", topic);

        BrokerSubscription {
            topic: topic.to_string(),
            receiver: sender.subscribe(),
        }
    }

    /// Drop every topic; open subscriptions observe end-of-stream
    pub async fn close(&self) {
        let mut topics = self.topics.write().await;
        debug!("Closing broker with {} topics", topics.len());
        topics.clear();
    }

    async fn sender(&self, topic: &str) -> broadcast::Sender<String> {
        if let Some(sender) = self.topics.read().await.get(topic) {
            return sender.clone();
        }

        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Publisher for InMemoryBroker {
    async fn publish(&self, topic: &str, payload: String) -> artbridge_core::Result<()> {
        let sender = self.sender(topic).await;
        sender
            .send(payload)
            .map(|receivers| debug!("Published to {} ({} receivers)", topic, receivers))
            .map_err(|_| ArtistError::Delivery(format!("no subscribers on topic {topic}")))
    }
}

/// A live subscription to one broker topic
#[derive(Debug)]
pub struct BrokerSubscription {
    topic: String,
    receiver: broadcast::Receiver<String>,
}

#[async_trait]
impl Subscriber for BrokerSubscription {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn next_message(&mut self) -> Option<Message> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Some(Message::new(self.topic.clone(), payload)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscriber on {} fell behind, {} messages lost",
                        self.topic, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
