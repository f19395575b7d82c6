/// Artist write paths - creation, edits, moderation transitions
use artbridge_core::lifecycle::Transition;
use artbridge_core::{
    Action, Actor, Artist, ArtistError, ArtistId, ArtistPatch, ArtistProfile, ArtistStore,
    CreateArtist, NewArtist, Owner, Result, StatusTransitionEngine,
};
use artbridge_sync::NameSyncHandle;
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to a record after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The record is kept, possibly with a new status
    Updated(Artist),
    /// The record was removed
    Removed(ArtistId),
}

/// Result of the privilege-dispatched delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A moderator removed the record
    Removed(ArtistId),
    /// The owner asked for removal; the record now waits in `DeletePending`
    Pending(Artist),
}

/// Every status change goes through [`StatusTransitionEngine`] here
#[derive(Clone)]
pub struct ArtistService {
    store: Arc<dyn ArtistStore>,
    sync: NameSyncHandle,
}

impl ArtistService {
    pub fn new(store: Arc<dyn ArtistStore>, sync: NameSyncHandle) -> Self {
        Self { store, sync }
    }

    /// Store a new record owned by `actor`, then ask for the owner's display name
    ///
    /// The record always starts in `UploadPending`. The name request is fire
    /// and forget: the record keeps the actor's login as display name until
    /// an identity change arrives.
    pub async fn create(&self, actor: &Actor, request: CreateArtist) -> Result<Artist> {
        debug!("Request to save Artist : {}", request.profile.name);

        let status = StatusTransitionEngine::on_create(request.id)?;
        if let Some(requested) = request.status.filter(|s| *s != status) {
            debug!("Ignoring requested status {} on create", requested);
        }
        request.profile.validate()?;

        let artist = self
            .store
            .insert(NewArtist {
                profile: request.profile,
                owner: Owner {
                    id: actor.user_id,
                    login: actor.login.clone(),
                    name: actor.login.clone(),
                },
                status,
            })
            .await?;

        self.sync.request_name_sync(actor.user_id);
        Ok(artist)
    }

    /// Replace the descriptive fields; the record goes back to review
    pub async fn update(
        &self,
        id: ArtistId,
        actor: &Actor,
        profile: ArtistProfile,
    ) -> Result<Artist> {
        debug!("Request to update Artist : {}", id);

        let current = self.load(id).await?;
        self.write_profile(&current, actor, profile).await
    }

    /// Merge `patch` over the stored fields; the record goes back to review
    pub async fn partial_update(
        &self,
        id: ArtistId,
        actor: &Actor,
        patch: ArtistPatch,
    ) -> Result<Artist> {
        debug!("Request to partially update Artist : {}", id);

        if patch.is_empty() {
            return Err(ArtistError::invalid_input("nothing to update"));
        }

        let current = self.load(id).await?;
        let profile = patch.apply_to(&current.profile);
        self.write_profile(&current, actor, profile).await
    }

    /// Owner asks for removal; the record is kept in `DeletePending`
    pub async fn request_delete(&self, id: ArtistId, actor: &Actor) -> Result<Artist> {
        self.kept(id, Action::RequestDelete, actor).await
    }

    /// Moderator publishes the record
    pub async fn approve(&self, id: ArtistId, actor: &Actor) -> Result<Artist> {
        let artist = self.kept(id, Action::Approve, actor).await?;
        info!("Artist {} approved by {}", id, actor.login);
        Ok(artist)
    }

    /// Moderator removes the record outright
    pub async fn hard_delete(&self, id: ArtistId, actor: &Actor) -> Result<ArtistId> {
        match self.transition(id, Action::HardDelete, actor).await? {
            TransitionOutcome::Removed(id) => Ok(id),
            TransitionOutcome::Updated(artist) => Err(ArtistError::invalid_input(format!(
                "artist {} was kept in {}",
                artist.id, artist.status
            ))),
        }
    }

    /// Single delete entry point: moderators remove, owners request removal
    pub async fn delete(&self, id: ArtistId, actor: &Actor) -> Result<DeleteOutcome> {
        debug!("Request to delete Artist : {}", id);

        if actor.is_moderator() {
            self.hard_delete(id, actor).await.map(DeleteOutcome::Removed)
        } else {
            self.request_delete(id, actor).await.map(DeleteOutcome::Pending)
        }
    }

    /// Apply `action` to the record's status without touching its fields
    pub async fn transition(
        &self,
        id: ArtistId,
        action: Action,
        actor: &Actor,
    ) -> Result<TransitionOutcome> {
        let current = self.load(id).await?;
        let transition =
            StatusTransitionEngine::plan(current.status, action, actor, current.owner.id)?;

        match transition {
            Transition::To(status) if status == current.status => {
                debug!("Artist {} already {}", id, status);
                Ok(TransitionOutcome::Updated(current))
            }
            Transition::To(status) => {
                debug!("Artist {} {} -> {}", id, current.status, status);
                self.store
                    .set_status(id, status)
                    .await?
                    .map(TransitionOutcome::Updated)
                    .ok_or_else(|| ArtistError::not_found("Artist", id))
            }
            Transition::Remove => {
                if !self.store.delete(id).await? {
                    return Err(ArtistError::not_found("Artist", id));
                }
                info!("Artist {} removed by {}", id, actor.login);
                Ok(TransitionOutcome::Removed(id))
            }
        }
    }

    async fn kept(&self, id: ArtistId, action: Action, actor: &Actor) -> Result<Artist> {
        match self.transition(id, action, actor).await? {
            TransitionOutcome::Updated(artist) => Ok(artist),
            TransitionOutcome::Removed(id) => Err(ArtistError::invalid_input(format!(
                "{action:?} removed artist {id}"
            ))),
        }
    }

    async fn write_profile(
        &self,
        current: &Artist,
        actor: &Actor,
        profile: ArtistProfile,
    ) -> Result<Artist> {
        let transition =
            StatusTransitionEngine::plan(current.status, Action::Update, actor, current.owner.id)?;
        let status = match transition {
            Transition::To(status) => status,
            Transition::Remove => {
                return Err(ArtistError::invalid_input("an update cannot remove a record"))
            }
        };
        profile.validate()?;

        self.store
            .update_profile(current.id, &profile, status)
            .await?
            .ok_or_else(|| ArtistError::not_found("Artist", current.id))
    }

    async fn load(&self, id: ArtistId) -> Result<Artist> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ArtistError::not_found("Artist", id))
    }
}
