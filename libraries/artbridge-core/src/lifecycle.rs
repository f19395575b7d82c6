//! Artist moderation lifecycle
//!
//! | action           | actor              | from        | to                |
//! |------------------|--------------------|-------------|-------------------|
//! | create           | any member         | (none)      | `UploadPending`   |
//! | `Update`         | owner              | any         | `RevisionPending` |
//! | `RequestDelete`  | owner              | any         | `DeletePending`   |
//! | `Approve`        | moderator          | any         | `Ok`              |
//! | `HardDelete`     | moderator          | any         | removed           |
//!
//! `update` re-enters `RevisionPending` from every state and `request_delete`
//! enters `DeletePending` from every state. `approve` and `hard_delete` need
//! a moderator; a member can never reach `Ok` on their own.

use serde::{Deserialize, Serialize};

use crate::error::{ArtistError, Result};
use crate::types::{Actor, ArtistId, ArtistStatus, OwnerId};

/// An action requested against an existing artist record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Owner edited the record
    Update,
    /// Owner asked for the record to be removed
    RequestDelete,
    /// Moderator published the record
    Approve,
    /// Moderator removed the record outright
    HardDelete,
}

impl Action {
    pub fn requires_moderator(&self) -> bool {
        matches!(self, Action::Approve | Action::HardDelete)
    }

    pub fn requires_ownership(&self) -> bool {
        matches!(self, Action::Update | Action::RequestDelete)
    }
}

/// Result of applying an action to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep the record with this status
    To(ArtistStatus),
    /// Remove the record from the store
    Remove,
}

/// Pure status decisions; persistence lives with the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTransitionEngine;

impl StatusTransitionEngine {
    /// Status assigned to a brand-new record
    ///
    /// Rejects documents that already carry an identifier. Any status the
    /// caller supplied is ignored.
    pub fn on_create(requested_id: Option<ArtistId>) -> Result<ArtistStatus> {
        if let Some(id) = requested_id {
            return Err(ArtistError::invalid_input(format!(
                "a new artist cannot already have an id ({id})"
            )));
        }
        Ok(ArtistStatus::UploadPending)
    }

    /// Decide where `action` takes a record currently in `current`
    pub fn plan(
        current: ArtistStatus,
        action: Action,
        actor: &Actor,
        owner_id: OwnerId,
    ) -> Result<Transition> {
        Self::authorize(action, actor, owner_id)?;

        let transition = match (action, current) {
            (Action::Update, _) => Transition::To(ArtistStatus::RevisionPending),
            (Action::RequestDelete, _) => Transition::To(ArtistStatus::DeletePending),
            // Re-approving a published record is accepted and changes nothing.
            (Action::Approve, ArtistStatus::Ok) => Transition::To(current),
            (Action::Approve, _) => Transition::To(ArtistStatus::Ok),
            (Action::HardDelete, _) => Transition::Remove,
        };

        Ok(transition)
    }

    /// Shorthand for callers that only care about the resulting status
    pub fn next_status(
        current: ArtistStatus,
        action: Action,
        actor: &Actor,
        owner_id: OwnerId,
    ) -> Result<Option<ArtistStatus>> {
        Ok(match Self::plan(current, action, actor, owner_id)? {
            Transition::To(status) => Some(status),
            Transition::Remove => None,
        })
    }

    fn authorize(action: Action, actor: &Actor, owner_id: OwnerId) -> Result<()> {
        if action.requires_moderator() && !actor.is_moderator() {
            return Err(ArtistError::unauthorized(format!(
                "{action:?} requires moderator privilege"
            )));
        }
        if action.requires_ownership() && !actor.owns(owner_id) {
            return Err(ArtistError::unauthorized(format!(
                "user {} is not the owner of this artist",
                actor.user_id
            )));
        }
        Ok(())
    }
}
