/// Authenticated caller types
use serde::{Deserialize, Serialize};

use super::OwnerId;

/// What an authenticated caller is allowed to do beyond owning records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Regular member; may create and edit their own artists
    Member,
    /// Moderator; may approve and hard-delete any artist
    Moderator,
}

/// The identity behind a request, as resolved from its bearer credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Member identifier in the identity service
    pub user_id: OwnerId,

    /// Login name carried by the credential
    pub login: String,

    pub privilege: Privilege,
}

impl Actor {
    pub fn new(user_id: OwnerId, login: impl Into<String>, privilege: Privilege) -> Self {
        Self {
            user_id,
            login: login.into(),
            privilege,
        }
    }

    /// Convenience constructor for a regular member
    pub fn member(user_id: OwnerId, login: impl Into<String>) -> Self {
        Self::new(user_id, login, Privilege::Member)
    }

    /// Convenience constructor for a moderator
    pub fn moderator(user_id: OwnerId, login: impl Into<String>) -> Self {
        Self::new(user_id, login, Privilege::Moderator)
    }

    pub fn is_moderator(&self) -> bool {
        self.privilege == Privilege::Moderator
    }

    pub fn owns(&self, owner_id: OwnerId) -> bool {
        self.user_id == owner_id
    }
}
