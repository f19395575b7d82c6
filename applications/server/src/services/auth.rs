/// Authentication service - JWT issuing and bearer resolution
use crate::error::{Result, ServerError};
use artbridge_core::{Actor, ArtistError, IdentityProvider, OwnerId, Privilege};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Longest lifetime a token may be issued with (ten years)
const MAX_TOKEN_HOURS: i64 = 24 * 365 * 10;

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiration: Duration,
    moderator_authority: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_expiration", &self.token_expiration)
            .field("moderator_authority", &self.moderator_authority)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Login
    pub user_id: OwnerId, // Member id in the identity service
    pub auth: String,     // Comma-separated authorities
    pub exp: i64,         // Expiration time
    pub iat: i64,         // Issued at
}

impl Claims {
    pub fn authorities(&self) -> impl Iterator<Item = &str> {
        self.auth.split(',').map(str::trim).filter(|a| !a.is_empty())
    }
}

impl AuthService {
    pub fn new(
        secret: &str,
        expiration_hours: u64,
        moderator_authority: impl Into<String>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiration: Duration::hours(
                i64::try_from(expiration_hours)
                    .unwrap_or(MAX_TOKEN_HOURS)
                    .min(MAX_TOKEN_HOURS),
            ),
            moderator_authority: moderator_authority.into(),
        }
    }

    /// Issue a token for `actor`
    pub fn create_token(&self, actor: &Actor) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.token_expiration;

        let auth = match actor.privilege {
            Privilege::Member => "ROLE_USER".to_string(),
            Privilege::Moderator => format!("ROLE_USER,{}", self.moderator_authority),
        };

        let claims = Claims {
            sub: actor.login.clone(),
            user_id: actor.user_id,
            auth,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Resolve a token to the caller it was issued for
    pub fn resolve(&self, token: &str) -> Result<Actor> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(ServerError::Auth("Missing bearer token".to_string()));
        }

        let claims = self.verify_token(token)?;
        let privilege = if claims.authorities().any(|a| a == self.moderator_authority) {
            Privilege::Moderator
        } else {
            Privilege::Member
        };

        Ok(Actor::new(claims.user_id, claims.sub, privilege))
    }
}

impl IdentityProvider for AuthService {
    fn authenticate(&self, bearer: &str) -> artbridge_core::Result<Actor> {
        self.resolve(bearer).map_err(|e| {
            tracing::debug!("Rejected bearer credential: {}", e);
            ArtistError::unauthorized(e.to_string())
        })
    }
}
