/// Server configuration
use crate::error::{Result, ServerError};
use artbridge_sync::{
    MalformedEventPolicy, DEAD_LETTER_TOPIC, NAME_REQUEST_TOPIC, NAME_UPDATE_TOPIC,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_messaging")]
    pub messaging: MessagingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    /// Authority in the token's `auth` claim that grants moderator privilege
    #[serde(default = "default_moderator_authority")]
    pub moderator_authority: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagingSettings {
    #[serde(default = "default_name_request_topic")]
    pub name_request_topic: String,

    #[serde(default = "default_name_update_topic")]
    pub name_update_topic: String,

    #[serde(default = "default_dead_letter_topic")]
    pub dead_letter_topic: String,

    /// Bound on queued outbound name requests
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub on_malformed: MalformedEventPolicy,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path` (if present) and the environment
    ///
    /// Environment variables use the `ARTBRIDGE_` prefix and `__` between
    /// section and key, e.g. `ARTBRIDGE_AUTH__JWT_SECRET`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(PathBuf::from(path)));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ARTBRIDGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set ARTBRIDGE_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ServerError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        if self.messaging.channel_capacity == 0 {
            return Err(ServerError::Config(
                "messaging.channel_capacity must be at least 1".to_string(),
            ));
        }

        if self.messaging.on_malformed == MalformedEventPolicy::DeadLetter
            && self.messaging.dead_letter_topic.is_empty()
        {
            return Err(ServerError::Config(
                "messaging.dead_letter_topic is required with on_malformed = dead_letter"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/artbridge.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        moderator_authority: default_moderator_authority(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_moderator_authority() -> String {
    "ROLE_ADMIN".to_string()
}

fn default_messaging() -> MessagingSettings {
    MessagingSettings {
        name_request_topic: default_name_request_topic(),
        name_update_topic: default_name_update_topic(),
        dead_letter_topic: default_dead_letter_topic(),
        channel_capacity: default_channel_capacity(),
        on_malformed: MalformedEventPolicy::default(),
    }
}

fn default_name_request_topic() -> String {
    NAME_REQUEST_TOPIC.to_string()
}

fn default_name_update_topic() -> String {
    NAME_UPDATE_TOPIC.to_string()
}

fn default_dead_letter_topic() -> String {
    DEAD_LETTER_TOPIC.to_string()
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            auth: default_auth(),
            messaging: default_messaging(),
        }
    }
}
