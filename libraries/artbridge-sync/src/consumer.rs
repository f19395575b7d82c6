use artbridge_core::{ArtistError, ArtistStore, IdentityChangeEvent, Publisher, Subscriber};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{Result, SyncError};

/// What the consumer does with a payload it cannot parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedEventPolicy {
    /// Log and drop the message, keep listening
    #[default]
    Skip,
    /// Republish the raw payload on the dead-letter topic, keep listening
    DeadLetter,
    /// Stop the consumer with [`ArtistError::MalformedEvent`]
    Halt,
}

/// Counters reported when the consumer stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerStats {
    /// Events parsed and applied
    pub applied: u64,
    /// Artist records whose owner name actually changed
    pub records_updated: u64,
    /// Payloads that failed to parse
    pub malformed: u64,
    /// Parsed events whose store writes failed
    pub failed: u64,
}

#[derive(Clone)]
struct DeadLetter {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

/// Applies identity changes to every artist owned by the changed member
///
/// The only writer of `Owner::name`. Each event is a plain overwrite, so
/// redelivering an event leaves the store as it was. No ordering is assumed
/// between events; for one member the last applied event wins.
#[derive(Clone)]
pub struct NameSyncConsumer {
    store: Arc<dyn ArtistStore>,
    policy: MalformedEventPolicy,
    dead_letter: Option<DeadLetter>,
}

impl std::fmt::Debug for NameSyncConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameSyncConsumer")
            .field("policy", &self.policy)
            .field(
                "dead_letter_topic",
                &self.dead_letter.as_ref().map(|d| d.topic.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl NameSyncConsumer {
    pub fn new(store: Arc<dyn ArtistStore>) -> Self {
        Self {
            store,
            policy: MalformedEventPolicy::default(),
            dead_letter: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MalformedEventPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Route malformed payloads to `topic` (also selects the `DeadLetter` policy)
    #[must_use]
    pub fn with_dead_letter(
        mut self,
        publisher: Arc<dyn Publisher>,
        topic: impl Into<String>,
    ) -> Self {
        self.policy = MalformedEventPolicy::DeadLetter;
        self.dead_letter = Some(DeadLetter {
            publisher,
            topic: topic.into(),
        });
        self
    }

    /// Policy applied to malformed payloads
    ///
    /// `DeadLetter` without a dead-letter target behaves as `Skip`.
    pub fn policy(&self) -> MalformedEventPolicy {
        match (self.policy, &self.dead_letter) {
            (MalformedEventPolicy::DeadLetter, None) => MalformedEventPolicy::Skip,
            (policy, _) => policy,
        }
    }

    /// Overwrite the owner name on every record owned by `event.owner_id`
    ///
    /// Returns how many records changed. Status and profile are untouched.
    pub async fn apply(&self, event: &IdentityChangeEvent) -> artbridge_core::Result<usize> {
        debug!("Request to modify member name : {}", event.owner_id);

        let owned = self.store.find_owned_by(event.owner_id).await?;
        let mut changed = 0;
        for artist in &owned {
            if self.store.set_owner_name(artist.id, &event.new_name).await? {
                changed += 1;
            }
        }

        debug!(
            "Member {} owns {} artists, {} renamed",
            event.owner_id,
            owned.len(),
            changed
        );
        Ok(changed)
    }

    /// Parse a raw inbound payload and apply it
    pub async fn handle_payload(&self, payload: &str) -> artbridge_core::Result<usize> {
        let event = IdentityChangeEvent::from_json(payload)?;
        self.apply(&event).await
    }

    /// Consume `subscriber` until it ends or `cancel` fires
    ///
    /// Store failures are logged and the message is lost. Malformed payloads
    /// follow the configured [`MalformedEventPolicy`]; only `Halt` ends the
    /// loop with an error.
    pub async fn run<S: Subscriber>(
        &self,
        mut subscriber: S,
        cancel: CancellationToken,
    ) -> Result<ConsumerStats> {
        if self.policy() != self.policy {
            warn!(
                "Dead-letter policy set without a dead-letter topic, \
                 malformed payloads will be dropped"
            );
        }
        info!(
            "Name sync consumer listening on {} (malformed: {:?})",
            subscriber.topic(),
            self.policy()
        );
        let mut stats = ConsumerStats::default();

        loop {
            let message = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                next = subscriber.next_message() => match next {
                    Some(message) => message,
                    None => {
                        info!("Topic {} closed", subscriber.topic());
                        break;
                    }
                },
            };

            debug!("MemberConsumer: {}", message.payload);

            match self.handle_payload(&message.payload).await {
                Ok(changed) => {
                    stats.applied += 1;
                    stats.records_updated += changed as u64;
                }
                Err(ArtistError::MalformedEvent(reason)) => {
                    stats.malformed += 1;
                    self.on_malformed(&message.payload, &reason).await?;
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("Failed to apply identity change: {}", e);
                }
            }
        }

        info!(
            "Name sync consumer stopped (applied: {}, updated: {}, malformed: {}, failed: {})",
            stats.applied, stats.records_updated, stats.malformed, stats.failed
        );
        Ok(stats)
    }

    /// Run on a spawned task
    pub fn spawn<S>(
        self,
        subscriber: S,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<ConsumerStats>>
    where
        S: Subscriber + 'static,
    {
        tokio::spawn(async move { self.run(subscriber, cancel).await })
    }

    async fn on_malformed(&self, payload: &str, reason: &str) -> Result<()> {
        match (self.policy(), &self.dead_letter) {
            (MalformedEventPolicy::Halt, _) => {
                error!("Malformed identity change, stopping consumer: {}", reason);
                Err(SyncError::Artist(ArtistError::malformed_event(reason)))
            }
            (MalformedEventPolicy::DeadLetter, Some(dead_letter)) => {
                warn!(
                    "Malformed identity change moved to {}: {}",
                    dead_letter.topic, reason
                );
                if let Err(e) = dead_letter
                    .publisher
                    .publish(&dead_letter.topic, payload.to_string())
                    .await
                {
                    warn!("Dead-letter publish failed, payload dropped: {}", e);
                }
                Ok(())
            }
            _ => {
                warn!("Dropping malformed identity change: {}", reason);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbridge_core::store::NewArtist;
    use artbridge_core::types::*;
    use artbridge_core::Message;
    use async_trait::async_trait;
    use mockall::mock;
    use std::collections::VecDeque;

    mock! {
        pub Store {}

        #[async_trait]
        impl ArtistStore for Store {
            async fn insert(&self, artist: NewArtist) -> artbridge_core::Result<Artist>;
            async fn get(&self, id: ArtistId) -> artbridge_core::Result<Option<Artist>>;
            async fn update_profile(
                &self,
                id: ArtistId,
                profile: &ArtistProfile,
                status: ArtistStatus,
            ) -> artbridge_core::Result<Option<Artist>>;
            async fn set_status(
                &self,
                id: ArtistId,
                status: ArtistStatus,
            ) -> artbridge_core::Result<Option<Artist>>;
            async fn set_owner_name(&self, id: ArtistId, name: &str) -> artbridge_core::Result<bool>;
            async fn delete(&self, id: ArtistId) -> artbridge_core::Result<bool>;
            async fn find_by_status(
                &self,
                status: ArtistStatus,
                page: PageRequest,
            ) -> artbridge_core::Result<Page<Artist>>;
            async fn find_owned_by(&self, owner_id: OwnerId) -> artbridge_core::Result<Vec<Artist>>;
        }
    }

    /// Replays a fixed list of payloads, then reports end-of-stream
    struct Scripted(VecDeque<Message>);

    impl Scripted {
        fn new(payloads: &[&str]) -> Self {
            Self(
                payloads
                    .iter()
                    .map(|p| Message::new("member-name", *p))
                    .collect(),
            )
        }
    }

    #[async_trait]
    impl Subscriber for Scripted {
        fn topic(&self) -> &str {
            "member-name"
        }

        async fn next_message(&mut self) -> Option<Message> {
            self.0.pop_front()
        }
    }

    fn artist(id: ArtistId, owner_id: OwnerId) -> Artist {
        Artist {
            id,
            profile: ArtistProfile::new(format!("artist{id}")),
            owner: Owner {
                id: owner_id,
                login: "jo".to_string(),
                name: "Old".to_string(),
            },
            status: ArtistStatus::Ok,
            created_at: "2024-06-01T00:00:00.000Z".to_string(),
            updated_at: "2024-06-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn apply_renames_every_owned_record() {
        let mut store = MockStore::new();
        store
            .expect_find_owned_by()
            .withf(|owner_id| *owner_id == 7)
            .returning(|_| Ok(vec![artist(3, 7), artist(2, 7), artist(1, 7)]));
        store
            .expect_set_owner_name()
            .withf(|_, name| name.to_string() == "Jo")
            .times(3)
            .returning(|id, _| Ok(id != 2));

        let consumer = NameSyncConsumer::new(Arc::new(store));
        let changed = consumer
            .apply(&IdentityChangeEvent::new(7, "Jo"))
            .await
            .unwrap();

        // Record 2 already carried the name
        assert_eq!(changed, 2);
    }

    #[tokio::test]
    async fn store_failures_do_not_stop_the_loop() {
        let mut store = MockStore::new();
        store
            .expect_find_owned_by()
            .withf(|owner_id| *owner_id == 1)
            .returning(|_| Err(ArtistError::storage("disk full")));
        store
            .expect_find_owned_by()
            .withf(|owner_id| *owner_id == 2)
            .returning(|_| Ok(vec![artist(10, 2)]));
        store
            .expect_set_owner_name()
            .times(1)
            .returning(|_, _| Ok(true));

        let consumer = NameSyncConsumer::new(Arc::new(store));
        let stats = consumer
            .run(
                Scripted::new(&[r#"{"id":1,"name":"A"}"#, r#"{"id":2,"name":"B"}"#]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.records_updated, 1);
    }

    #[tokio::test]
    async fn skip_policy_drops_malformed_payloads() {
        let mut store = MockStore::new();
        store
            .expect_find_owned_by()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let consumer = NameSyncConsumer::new(Arc::new(store));
        let stats = consumer
            .run(
                Scripted::new(&["not json", r#"{"name":"no id"}"#, r#"{"id":"5","name":"E"}"#]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.applied, 1);
    }

    #[tokio::test]
    async fn halt_policy_stops_on_first_malformed_payload() {
        let mut store = MockStore::new();
        store.expect_find_owned_by().never();

        let consumer =
            NameSyncConsumer::new(Arc::new(store)).with_policy(MalformedEventPolicy::Halt);
        let err = consumer
            .run(
                Scripted::new(&["{", r#"{"id":1,"name":"A"}"#]),
                CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Artist(ArtistError::MalformedEvent(_))));
    }

    #[tokio::test]
    async fn cancelled_consumer_reads_nothing() {
        let mut store = MockStore::new();
        store.expect_find_owned_by().never();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let consumer = NameSyncConsumer::new(Arc::new(store));
        let stats = consumer
            .run(Scripted::new(&[r#"{"id":1,"name":"A"}"#]), cancel)
            .await
            .unwrap();

        assert_eq!(stats, ConsumerStats::default());
    }

    #[tokio::test]
    async fn dead_letter_policy_without_target_skips() {
        let mut store = MockStore::new();
        store
            .expect_find_owned_by()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let consumer = NameSyncConsumer::new(Arc::new(store))
            .with_policy(MalformedEventPolicy::DeadLetter);
        assert_eq!(consumer.policy(), MalformedEventPolicy::Skip);

        let stats = consumer
            .run(
                Scripted::new(&["nope", r#"{"id":3,"name":"C"}"#]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.applied, 1);
    }

    #[test]
    fn dead_letter_target_selects_its_policy() {
        let consumer = NameSyncConsumer::new(Arc::new(MockStore::new()))
            .with_dead_letter(Arc::new(crate::InMemoryBroker::default()), "member-name-dlq");
        assert_eq!(consumer.policy(), MalformedEventPolicy::DeadLetter);

        let halted = consumer.with_policy(MalformedEventPolicy::Halt);
        assert_eq!(halted.policy(), MalformedEventPolicy::Halt);
    }

    #[test]
    fn policy_parses_from_config_strings() {
        let policy: MalformedEventPolicy = serde_json::from_str("\"dead_letter\"").unwrap();
        assert_eq!(policy, MalformedEventPolicy::DeadLetter);
        assert_eq!(MalformedEventPolicy::default(), MalformedEventPolicy::Skip);
    }
}
