use crate::artists;
use artbridge_core::{error::Result, store::NewArtist, types::*, ArtistStore};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Artist store backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteArtistStore {
    pool: SqlitePool,
}

impl SqliteArtistStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtistStore for SqliteArtistStore {
    async fn insert(&self, artist: NewArtist) -> Result<Artist> {
        artists::create(&self.pool, artist).await
    }

    async fn get(&self, id: ArtistId) -> Result<Option<Artist>> {
        artists::get_by_id(&self.pool, id).await
    }

    async fn update_profile(
        &self,
        id: ArtistId,
        profile: &ArtistProfile,
        status: ArtistStatus,
    ) -> Result<Option<Artist>> {
        artists::update_profile(&self.pool, id, profile, status).await
    }

    async fn set_status(&self, id: ArtistId, status: ArtistStatus) -> Result<Option<Artist>> {
        artists::set_status(&self.pool, id, status).await
    }

    async fn set_owner_name(&self, id: ArtistId, name: &str) -> Result<bool> {
        artists::set_owner_name(&self.pool, id, name).await
    }

    async fn delete(&self, id: ArtistId) -> Result<bool> {
        artists::delete(&self.pool, id).await
    }

    async fn find_by_status(
        &self,
        status: ArtistStatus,
        page: PageRequest,
    ) -> Result<Page<Artist>> {
        artists::get_by_status(&self.pool, status, page).await
    }

    async fn find_owned_by(&self, owner_id: OwnerId) -> Result<Vec<Artist>> {
        artists::get_by_member(&self.pool, owner_id).await
    }
}
