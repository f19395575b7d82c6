//! Member-name synchronization payloads
//!
//! Two messages flow between this service and the identity service:
//!
//! - [`NameRequestEvent`] goes out when an artist is created. Its wire form
//!   is the bare owner id as a decimal string.
//! - [`IdentityChangeEvent`] comes back whenever a member's display name is
//!   (re)published. Its wire form is a JSON object with at least `id` and
//!   `name`; other keys are ignored.
//!
//! Neither message is persisted and there is no request/response
//! correlation between them.

use serde::{Deserialize, Deserializer, Serialize};

use super::OwnerId;
use crate::error::{ArtistError, Result};

/// Request for the identity service to (eventually) publish a member's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRequestEvent {
    pub owner_id: OwnerId,
}

impl NameRequestEvent {
    pub fn new(owner_id: OwnerId) -> Self {
        Self { owner_id }
    }

    pub fn to_payload(&self) -> String {
        self.owner_id.to_string()
    }

    pub fn from_payload(payload: &str) -> Result<Self> {
        payload
            .trim()
            .parse::<OwnerId>()
            .map(Self::new)
            .map_err(|e| ArtistError::malformed_event(format!("owner id {payload:?}: {e}")))
    }
}

/// A member's current display name, as published by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityChangeEvent {
    #[serde(rename = "id", deserialize_with = "owner_id_from_number_or_string")]
    pub owner_id: OwnerId,

    #[serde(rename = "name")]
    pub new_name: String,
}

impl IdentityChangeEvent {
    pub fn new(owner_id: OwnerId, new_name: impl Into<String>) -> Self {
        Self {
            owner_id,
            new_name: new_name.into(),
        }
    }

    /// Parse an inbound payload
    ///
    /// Any failure is reported as [`ArtistError::MalformedEvent`] so the
    /// caller can decide whether to drop, dead-letter, or stop.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| ArtistError::malformed_event(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The identity service has sent ids both as JSON numbers and as strings
fn owner_id_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<OwnerId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(OwnerId),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse::<OwnerId>()
            .map_err(|e| serde::de::Error::custom(format!("invalid owner id {text:?}: {e}"))),
    }
}
