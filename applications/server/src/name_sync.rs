/// Member-name synchronization tasks owned by the server process
use crate::config::MessagingSettings;
use crate::error::Result;
use artbridge_core::{ArtistStore, Publisher, Subscriber};
use artbridge_sync::{
    ConsumerStats, MalformedEventPolicy, NameSyncConsumer, NameSyncHandle, NameSyncProducer,
    ProducerStats, SyncError,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Counters from both halves after shutdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub consumer: ConsumerStats,
    pub producer: ProducerStats,
}

/// Producer and consumer wired to one outbound and one inbound channel
///
/// Dead letters share the outbound channel with name requests.
pub struct NameSyncRuntime {
    producer: NameSyncProducer,
    consumer: JoinHandle<artbridge_sync::Result<ConsumerStats>>,
    cancel: CancellationToken,
    input_closed: CancellationToken,
}

impl NameSyncRuntime {
    pub fn start<S>(
        settings: &MessagingSettings,
        store: Arc<dyn ArtistStore>,
        outbound: Arc<dyn Publisher>,
        inbound: S,
    ) -> Self
    where
        S: Subscriber + 'static,
    {
        let producer = NameSyncProducer::start(
            Arc::clone(&outbound),
            settings.name_request_topic.clone(),
            settings.channel_capacity,
        );

        let mut consumer = NameSyncConsumer::new(store).with_policy(settings.on_malformed);
        if settings.on_malformed == MalformedEventPolicy::DeadLetter {
            consumer = consumer.with_dead_letter(outbound, settings.dead_letter_topic.clone());
        }

        let cancel = CancellationToken::new();
        let input_closed = CancellationToken::new();
        let consumer = {
            let cancel = cancel.clone();
            let input_closed = input_closed.clone();
            tokio::spawn(async move {
                let result = consumer.run(inbound, cancel).await;
                input_closed.cancel();
                result
            })
        };

        Self {
            producer,
            consumer,
            cancel,
            input_closed,
        }
    }

    /// Handle for services that request names
    pub fn handle(&self) -> NameSyncHandle {
        self.producer.handle()
    }

    /// Resolves once the consumer has stopped on its own
    pub async fn input_closed(&self) {
        self.input_closed.cancelled().await;
    }

    /// Stop the consumer, drain queued requests, and report both halves
    ///
    /// The producer is drained even when the consumer ended with an error.
    pub async fn shutdown(self) -> Result<SyncReport> {
        self.cancel.cancel();
        let consumer = self.consumer.await.map_err(SyncError::from);
        let producer = self.producer.shutdown().await?;

        let consumer = consumer??;
        info!(
            "Name sync stopped (applied: {}, requested: {})",
            consumer.applied, producer.sent
        );
        Ok(SyncReport { consumer, producer })
    }
}
