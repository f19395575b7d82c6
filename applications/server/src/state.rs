/// Shared application state
use crate::services::{ArtistService, AuthService, ModerationQueryService};
use artbridge_core::{Actor, ArtistStore, IdentityProvider};
use artbridge_sync::NameSyncHandle;
use std::sync::Arc;

/// Services shared by every request-scoped operation
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArtistStore>,
    pub auth_service: Arc<AuthService>,
    pub artists: Arc<ArtistService>,
    pub moderation: Arc<ModerationQueryService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ArtistStore>,
        auth_service: Arc<AuthService>,
        sync: NameSyncHandle,
    ) -> Self {
        Self {
            artists: Arc::new(ArtistService::new(Arc::clone(&store), sync)),
            moderation: Arc::new(ModerationQueryService::new(Arc::clone(&store))),
            store,
            auth_service,
        }
    }

    /// Resolve a bearer credential to the caller
    pub fn authenticate(&self, bearer: &str) -> artbridge_core::Result<Actor> {
        self.auth_service.authenticate(bearer)
    }
}
