//! Artist types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArtistError;

pub type ArtistId = i64;

/// Member identifier issued by the identity service
pub type OwnerId = i64;

/// Moderation status of an artist record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtistStatus {
    /// Newly created, waiting for first approval
    UploadPending,
    /// Edited after creation, waiting for re-review
    RevisionPending,
    /// Owner asked for removal, waiting for a moderator
    DeletePending,
    /// Approved and published
    Ok,
}

impl ArtistStatus {
    pub const ALL: [ArtistStatus; 4] = [
        ArtistStatus::UploadPending,
        ArtistStatus::RevisionPending,
        ArtistStatus::DeletePending,
        ArtistStatus::Ok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtistStatus::UploadPending => "UPLOAD_PENDING",
            ArtistStatus::RevisionPending => "REVISION_PENDING",
            ArtistStatus::DeletePending => "DELETE_PENDING",
            ArtistStatus::Ok => "OK",
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self, ArtistStatus::Ok)
    }
}

impl fmt::Display for ArtistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtistStatus {
    type Err = ArtistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "UPLOAD_PENDING" => Ok(ArtistStatus::UploadPending),
            "REVISION_PENDING" => Ok(ArtistStatus::RevisionPending),
            "DELETE_PENDING" => Ok(ArtistStatus::DeletePending),
            "OK" => Ok(ArtistStatus::Ok),
            other => Err(ArtistError::invalid_input(format!(
                "unknown artist status: {other}"
            ))),
        }
    }
}

/// Denormalized identity of the member who created an artist
///
/// `login` is fixed at creation. `name` is the display name pushed by the
/// identity service and is only ever rewritten by the name-sync consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub login: String,
    pub name: String,
}

/// Descriptive artist payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub name: String,
    /// Free-form biography, up to 4000 characters
    pub info: Option<String>,
    pub real_name: Option<String>,
    pub img_url: Option<String>,
    pub phone: Option<String>,
    pub career: Option<String>,
    pub artwork_title: Option<String>,
}

impl ArtistProfile {
    pub const MAX_INFO_LEN: usize = 4000;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the constraints the store relies on
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(ArtistError::invalid_input("artist name must not be empty"));
        }
        if let Some(info) = &self.info {
            if info.chars().count() > Self::MAX_INFO_LEN {
                return Err(ArtistError::invalid_input(format!(
                    "artist info exceeds {} characters",
                    Self::MAX_INFO_LEN
                )));
            }
        }
        Ok(())
    }
}

/// An artist record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    #[serde(flatten)]
    pub profile: ArtistProfile,
    pub owner: Owner,
    pub status: ArtistStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new artist
///
/// `id` and `status` exist because callers send whole artist documents; a
/// present `id` is rejected and `status` is always replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateArtist {
    #[serde(default)]
    pub id: Option<ArtistId>,
    #[serde(default)]
    pub status: Option<ArtistStatus>,
    #[serde(flatten)]
    pub profile: ArtistProfile,
}

impl CreateArtist {
    pub fn new(profile: ArtistProfile) -> Self {
        Self {
            id: None,
            status: None,
            profile,
        }
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub info: Option<String>,
    pub real_name: Option<String>,
    pub img_url: Option<String>,
    pub phone: Option<String>,
    pub career: Option<String>,
    pub artwork_title: Option<String>,
}

impl ArtistPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.info.is_none()
            && self.real_name.is_none()
            && self.img_url.is_none()
            && self.phone.is_none()
            && self.career.is_none()
            && self.artwork_title.is_none()
    }

    /// Merge the patch over an existing profile
    pub fn apply_to(self, profile: &ArtistProfile) -> ArtistProfile {
        ArtistProfile {
            name: self.name.unwrap_or_else(|| profile.name.clone()),
            info: self.info.or_else(|| profile.info.clone()),
            real_name: self.real_name.or_else(|| profile.real_name.clone()),
            img_url: self.img_url.or_else(|| profile.img_url.clone()),
            phone: self.phone.or_else(|| profile.phone.clone()),
            career: self.career.or_else(|| profile.career.clone()),
            artwork_title: self.artwork_title.or_else(|| profile.artwork_title.clone()),
        }
    }
}
