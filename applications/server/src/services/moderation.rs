/// Read-only moderation queues
use artbridge_core::{
    Actor, Artist, ArtistError, ArtistId, ArtistStatus, ArtistStore, OwnerId, Page, PageRequest,
    Result,
};
use std::sync::Arc;
use tracing::debug;

/// Status-partitioned views over the artist store
///
/// Every queue is an exact status filter ordered newest first, so a record
/// never shows up in a queue other than its own. Only the published queue is
/// open to members.
#[derive(Clone)]
pub struct ModerationQueryService {
    store: Arc<dyn ArtistStore>,
}

impl ModerationQueryService {
    pub fn new(store: Arc<dyn ArtistStore>) -> Self {
        Self { store }
    }

    pub async fn list_published(&self, page: PageRequest) -> Result<Page<Artist>> {
        debug!("Request to get published Artists");
        self.store.find_by_status(ArtistStatus::Ok, page).await
    }

    pub async fn list_upload_pending(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Page<Artist>> {
        self.list_by_status(actor, ArtistStatus::UploadPending, page).await
    }

    pub async fn list_revision_pending(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Page<Artist>> {
        self.list_by_status(actor, ArtistStatus::RevisionPending, page).await
    }

    pub async fn list_delete_pending(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Page<Artist>> {
        self.list_by_status(actor, ArtistStatus::DeletePending, page).await
    }

    /// Any queue by status; pending queues need a moderator
    pub async fn list_by_status(
        &self,
        actor: &Actor,
        status: ArtistStatus,
        page: PageRequest,
    ) -> Result<Page<Artist>> {
        debug!("Request to get {} Artists", status);

        if status.is_pending() && !actor.is_moderator() {
            return Err(ArtistError::unauthorized(format!(
                "the {status} queue is visible to moderators only"
            )));
        }

        self.store.find_by_status(status, page).await
    }

    pub async fn find_one(&self, id: ArtistId) -> Result<Artist> {
        debug!("Request to get Artist : {}", id);
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ArtistError::not_found("Artist", id))
    }

    /// Every record created by `owner_id`, whatever its status
    pub async fn find_owned_by(&self, owner_id: OwnerId) -> Result<Vec<Artist>> {
        debug!("Request to get Artists of member : {}", owner_id);
        self.store.find_owned_by(owner_id).await
    }
}
