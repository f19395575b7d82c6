//! Storage trait for artist records

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Artist, ArtistId, ArtistProfile, ArtistStatus, Owner, OwnerId, Page, PageRequest,
};

/// A record ready to be inserted; the store assigns `id` and timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub profile: ArtistProfile,
    pub owner: Owner,
    pub status: ArtistStatus,
}

/// Durable keyed storage for artist records
///
/// Every method is a single-record (or single-statement) operation and is
/// expected to be atomic at the store layer. Callers do no locking of their
/// own.
///
/// The write methods are deliberately narrow: profile edits carry the status
/// decided by the lifecycle engine, and the owner's display name has its own
/// path used only by member-name synchronization.
#[async_trait]
pub trait ArtistStore: Send + Sync {
    /// Insert a new record and return it with its assigned id
    async fn insert(&self, artist: NewArtist) -> Result<Artist>;

    /// Get a record by id
    async fn get(&self, id: ArtistId) -> Result<Option<Artist>>;

    /// Replace the descriptive payload and status of a record
    ///
    /// Returns `None` when the record does not exist.
    async fn update_profile(
        &self,
        id: ArtistId,
        profile: &ArtistProfile,
        status: ArtistStatus,
    ) -> Result<Option<Artist>>;

    /// Set the status of a record, leaving everything else untouched
    async fn set_status(&self, id: ArtistId, status: ArtistStatus) -> Result<Option<Artist>>;

    /// Overwrite the owner's display name on one record
    ///
    /// Returns `true` when the stored value changed. Writing the value that
    /// is already stored is a no-op.
    async fn set_owner_name(&self, id: ArtistId, name: &str) -> Result<bool>;

    /// Remove a record; returns `false` when it did not exist
    async fn delete(&self, id: ArtistId) -> Result<bool>;

    /// Records with exactly `status`, newest first
    async fn find_by_status(&self, status: ArtistStatus, page: PageRequest)
        -> Result<Page<Artist>>;

    /// Every record created by `owner_id`, newest first
    async fn find_owned_by(&self, owner_id: OwnerId) -> Result<Vec<Artist>>;

    /// Convenience check built on `get`
    async fn exists(&self, id: ArtistId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
