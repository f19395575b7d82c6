//! Common test utilities and fixtures

#![allow(dead_code)]

use artbridge_core::{Actor, ArtistProfile, ArtistStore, CreateArtist};
use artbridge_server::{AppState, AuthService};
use artbridge_storage::SqliteArtistStore;
use artbridge_sync::{BrokerSubscription, InMemoryBroker, NameSyncProducer, NAME_REQUEST_TOPIC};
use std::sync::Arc;
use tempfile::TempDir;

pub const SECRET: &str = "test-secret";

/// Services over a real `SQLite` file, with name requests captured on a broker topic
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<SqliteArtistStore>,
    pub broker: Arc<InMemoryBroker>,
    pub requests: BrokerSubscription,
    producer: Option<NameSyncProducer>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("server.db").display());

        let pool = artbridge_storage::create_pool(&db_url, 5)
            .await
            .expect("Failed to create pool");
        artbridge_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let store = Arc::new(SqliteArtistStore::new(pool));
        let broker = Arc::new(InMemoryBroker::new(64));
        let requests = broker.subscribe(NAME_REQUEST_TOPIC).await;
        let producer = NameSyncProducer::start(broker.clone(), NAME_REQUEST_TOPIC, 64);

        let state = AppState::new(
            store.clone() as Arc<dyn ArtistStore>,
            Arc::new(AuthService::new(SECRET, 1, "ROLE_ADMIN")),
            producer.handle(),
        );

        Self {
            state,
            store,
            broker,
            requests,
            producer: Some(producer),
            _temp_dir: temp_dir,
        }
    }

    /// Flush pending name requests and return how many were published
    pub async fn shutdown_producer(&mut self) -> u64 {
        let producer = self.producer.take().expect("producer already shut down");
        producer.shutdown().await.expect("producer shutdown").sent
    }

    /// Create an artist as `owner` through the service
    pub async fn create(&self, owner: &Actor, name: &str) -> artbridge_core::Artist {
        self.state
            .artists
            .create(owner, CreateArtist::new(ArtistProfile::new(name)))
            .await
            .expect("Failed to create artist")
    }
}

pub mod fixtures {
    use artbridge_core::Actor;

    pub const OWNER_ID: i64 = 42;

    pub fn owner() -> Actor {
        Actor::member(OWNER_ID, "painter")
    }

    pub fn stranger() -> Actor {
        Actor::member(7, "stranger")
    }

    pub fn moderator() -> Actor {
        Actor::moderator(1, "admin")
    }
}
