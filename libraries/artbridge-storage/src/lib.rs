//! ArtBridge Storage
//!
//! `SQLite` persistence for artist records.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `artists` slice owns its queries and row mapping
//! - **Single-statement writes**: every mutation is one `UPDATE ... RETURNING`
//!   (or `INSERT ... RETURNING`), so per-record atomicity comes from `SQLite`
//! - **Embedded migrations**: schema ships inside the binary
//!
//! # Example
//!
//! ```rust,no_run
//! use artbridge_core::{ArtistStatus, ArtistStore, PageRequest};
//! use artbridge_storage::{create_pool, run_migrations, SqliteArtistStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://artbridge.db", 5).await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteArtistStore::new(pool);
//! let published = store.find_by_status(ArtistStatus::Ok, PageRequest::default()).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod artists;

pub use context::SqliteArtistStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://artbridge.db>`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!(
        "Pool created with up to {} connections",
        max_connections.max(1)
    );

    Ok(pool)
}
