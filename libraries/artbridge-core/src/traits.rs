/// Core traits for the artist service
use crate::error::Result;
use crate::types::Actor;

/// Authenticated-identity lookup
///
/// Implementers turn a bearer credential into the caller's member id, login,
/// and privilege. How the credential is validated is up to the implementer.
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer credential (with or without the `Bearer ` prefix)
    ///
    /// # Errors
    /// Returns [`crate::ArtistError::Unauthorized`] if the credential is invalid
    fn authenticate(&self, bearer: &str) -> Result<Actor>;
}
