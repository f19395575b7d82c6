use artbridge_core::{NameRequestEvent, OwnerId, Publisher};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Counters reported when the producer shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProducerStats {
    /// Requests handed to the publisher successfully
    pub sent: u64,
    /// Requests the publisher refused
    pub failed: u64,
    /// Requests that never reached the background task (queue full or closed)
    pub dropped: u64,
}

/// Owner of the background task that publishes name requests
///
/// Created at startup with [`NameSyncProducer::start`] and released with
/// [`NameSyncProducer::shutdown`]. Request paths hold a cheap
/// [`NameSyncHandle`] instead of the producer itself.
///
/// Delivery is at most once. A request that cannot be queued or published is
/// logged and counted, never retried, and never reported to the caller; the
/// owner's display name then stays at its creation-time value until the
/// identity service publishes a change on its own.
#[derive(Debug)]
pub struct NameSyncProducer {
    handle: NameSyncHandle,
    cancel: CancellationToken,
    task: JoinHandle<ProducerStats>,
}

/// Cloneable, non-blocking entry point for name requests
#[derive(Debug, Clone)]
pub struct NameSyncHandle {
    sender: mpsc::Sender<NameRequestEvent>,
    dropped: Arc<AtomicU64>,
}

impl NameSyncProducer {
    /// Spawn the publishing task
    ///
    /// `capacity` bounds how many requests may wait for the publisher.
    pub fn start(
        publisher: Arc<dyn Publisher>,
        topic: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let topic = topic.into();
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let cancel = CancellationToken::new();

        info!("Name sync producer starting on topic {}", topic);

        let task = tokio::spawn(Self::run(publisher, topic, receiver, cancel.clone()));

        Self {
            handle: NameSyncHandle {
                sender,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            cancel,
            task,
        }
    }

    /// Handle for request-scoped code
    pub fn handle(&self) -> NameSyncHandle {
        self.handle.clone()
    }

    /// Queue a name request; see [`NameSyncHandle::request_name_sync`]
    pub fn request_name_sync(&self, owner_id: OwnerId) {
        self.handle.request_name_sync(owner_id);
    }

    /// Stop accepting requests, publish what is already queued, and release the task
    pub async fn shutdown(self) -> Result<ProducerStats> {
        info!("Shutting down name sync producer");
        self.cancel.cancel();

        let mut stats = self.task.await?;
        stats.dropped = self.handle.dropped.load(Ordering::Relaxed);

        info!(
            "Name sync producer stopped (sent: {}, failed: {}, dropped: {})",
            stats.sent, stats.failed, stats.dropped
        );
        Ok(stats)
    }

    async fn run(
        publisher: Arc<dyn Publisher>,
        topic: String,
        mut receiver: mpsc::Receiver<NameRequestEvent>,
        cancel: CancellationToken,
    ) -> ProducerStats {
        let mut stats = ProducerStats::default();

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                next = receiver.recv() => match next {
                    Some(event) => {
                        Self::publish(publisher.as_ref(), &topic, event, &mut stats).await;
                    }
                    None => break,
                },
            }
        }

        // Requests accepted before shutdown still go out
        receiver.close();
        while let Some(event) = receiver.recv().await {
            Self::publish(publisher.as_ref(), &topic, event, &mut stats).await;
        }

        stats
    }

    async fn publish(
        publisher: &dyn Publisher,
        topic: &str,
        event: NameRequestEvent,
        stats: &mut ProducerStats,
    ) {
        match publisher.publish(topic, event.to_payload()).await {
            Ok(()) => {
                stats.sent += 1;
                debug!("Requested member name for {}", event.owner_id);
            }
            Err(e) => {
                stats.failed += 1;
                warn!("Member name request for {} lost: {}", event.owner_id, e);
            }
        }
    }
}

impl NameSyncHandle {
    /// Queue a request for the identity service to publish `owner_id`'s name
    ///
    /// Never blocks and never fails from the caller's point of view.
    pub fn request_name_sync(&self, owner_id: OwnerId) {
        if let Err(e) = self.sender.try_send(NameRequestEvent::new(owner_id)) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!("Member name request for {} dropped: {}", owner_id, e);
        }
    }

    /// Whether the producer behind this handle has shut down
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbridge_core::ArtistError;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Channel {}

        #[async_trait]
        impl Publisher for Channel {
            async fn publish(&self, topic: &str, payload: String) -> artbridge_core::Result<()>;
        }
    }

    #[tokio::test]
    async fn publishes_owner_id_as_bare_string() {
        let mut channel = MockChannel::new();
        channel
            .expect_publish()
            .withf(|topic, payload| {
                topic.to_string() == "member-name-request" && payload.as_str() == "42"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let producer = NameSyncProducer::start(Arc::new(channel), "member-name-request", 8);
        producer.request_name_sync(42);

        let stats = producer.shutdown().await.unwrap();
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn publish_failures_are_counted_not_raised() {
        let mut channel = MockChannel::new();
        channel
            .expect_publish()
            .times(2)
            .returning(|_, _| Err(ArtistError::Delivery("broker down".to_string())));

        let producer = NameSyncProducer::start(Arc::new(channel), "member-name-request", 8);
        let handle = producer.handle();
        handle.request_name_sync(1);
        handle.request_name_sync(2);

        let stats = producer.shutdown().await.unwrap();
        assert_eq!(stats.sent, 0);
        assert_eq!(stats.failed, 2);
    }

    #[tokio::test]
    async fn requests_after_shutdown_are_dropped() {
        let mut channel = MockChannel::new();
        channel.expect_publish().never();

        let producer = NameSyncProducer::start(Arc::new(channel), "member-name-request", 8);
        let handle = producer.handle();
        producer.shutdown().await.unwrap();

        assert!(handle.is_closed());
        handle.request_name_sync(5);
    }
}
