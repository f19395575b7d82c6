/// ArtBridge Server - artist moderation and member-name synchronization
use anyhow::Context;
use artbridge_core::{Actor, ArtistStatus, ArtistStore, PageRequest, Privilege};
use artbridge_server::{
    config::ServerConfig, services::AuthService, state::AppState, NameSyncRuntime,
};
use artbridge_storage::SqliteArtistStore;
use artbridge_sync::{LinePublisher, LineSubscriber, NameSyncProducer};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "artbridge-server")]
#[command(about = "ArtBridge artist moderation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync member names over stdin/stdout until Ctrl-C or end of input
    Serve,
    /// Issue a token for local testing
    Token {
        /// Member id in the identity service
        #[arg(long)]
        user_id: i64,
        /// Login name
        #[arg(long)]
        login: String,
        /// Grant moderator privilege
        #[arg(long)]
        moderator: bool,
    },
    /// Print one page of a moderation queue
    Pending {
        /// Queue to list (upload_pending, revision_pending, delete_pending, ok)
        #[arg(long, default_value = "upload_pending")]
        status: ArtistStatus,
        /// Page number, starting at 0
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 20)]
        size: u32,
        /// Bearer token of the caller
        #[arg(long, env = "ARTBRIDGE_TOKEN")]
        token: Option<String>,
    },
    /// Approve an artist as a moderator
    Approve {
        /// Artist id
        #[arg(long)]
        id: i64,
        /// Bearer token of the moderator
        #[arg(long, env = "ARTBRIDGE_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "artbridge_server=info,artbridge_sync=info,artbridge_storage=info".into()
            }),
        )
        // stdout carries outbound messages
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load()?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(&config).await?;
            // A pending stdin read would keep the runtime from shutting down
            std::process::exit(0);
        }
        Commands::Token {
            user_id,
            login,
            moderator,
        } => issue_token(&config, user_id, login, moderator)?,
        Commands::Pending {
            status,
            page,
            size,
            token,
        } => {
            let page = PageRequest::new(page, size);
            list_queue(&config, status, page, token.as_deref()).await?;
        }
        Commands::Approve { id, token } => approve(&config, id, &token).await?,
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_hours,
        config.auth.moderator_authority.clone(),
    )
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    let storage = &config.storage;
    let pool = artbridge_storage::create_pool(&storage.database_url, storage.max_connections)
        .await
        .context("opening database")?;
    artbridge_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");
    Ok(pool)
}

/// Run both sync halves against stdin/stdout until Ctrl-C or end of input
///
/// Identity changes are read from stdin, one JSON payload per line. Name
/// requests and dead letters are written to stdout as envelope lines. Logs
/// go to stderr.
async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting ArtBridge Server");

    let pool = open_database(config).await?;
    let store: Arc<dyn ArtistStore> = Arc::new(SqliteArtistStore::new(pool.clone()));

    let name_sync = NameSyncRuntime::start(
        &config.messaging,
        Arc::clone(&store),
        Arc::new(LinePublisher::stdout()),
        LineSubscriber::stdin(config.messaging.name_update_topic.clone()),
    );

    let state = AppState::new(store, Arc::new(auth_service(config)), name_sync.handle());
    let published = state
        .moderation
        .list_published(PageRequest::first(1))
        .await?
        .total_elements;
    tracing::info!(
        "Ready ({} published artists), reading identity changes from stdin",
        published
    );

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
            tracing::info!("Shutdown requested");
        }
        () = name_sync.input_closed() => tracing::info!("Identity change input closed"),
    }

    drop(state);
    match name_sync.shutdown().await {
        Ok(report) => tracing::info!(
            "Applied {} identity changes, sent {} name requests ({} failed)",
            report.consumer.applied,
            report.producer.sent,
            report.producer.failed
        ),
        Err(e) => tracing::error!("Name sync failed: {}", e),
    }
    pool.close().await;

    tracing::info!("ArtBridge Server stopped");
    Ok(())
}

fn issue_token(
    config: &ServerConfig,
    user_id: i64,
    login: String,
    moderator: bool,
) -> anyhow::Result<()> {
    let privilege = if moderator {
        Privilege::Moderator
    } else {
        Privilege::Member
    };
    let token = auth_service(config).create_token(&Actor::new(user_id, login, privilege))?;
    println!("{token}");
    Ok(())
}

/// State for one-shot commands; the producer is released before returning
///
/// Queue listing and approval never request names, but the producer still
/// writes to stdout so any request would be visible rather than lost.
async fn with_state<T, F, Fut>(config: &ServerConfig, f: F) -> anyhow::Result<T>
where
    F: FnOnce(AppState) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let pool = open_database(config).await?;
    let store: Arc<dyn ArtistStore> = Arc::new(SqliteArtistStore::new(pool.clone()));
    let producer = NameSyncProducer::start(
        Arc::new(LinePublisher::stdout()),
        config.messaging.name_request_topic.clone(),
        config.messaging.channel_capacity,
    );

    let state = AppState::new(store, Arc::new(auth_service(config)), producer.handle());
    let result = f(state).await;

    producer.shutdown().await?;
    pool.close().await;
    result
}

async fn list_queue(
    config: &ServerConfig,
    status: ArtistStatus,
    page: PageRequest,
    token: Option<&str>,
) -> anyhow::Result<()> {
    let artists = with_state(config, |state| async move {
        let page = match token {
            Some(token) => {
                let actor = state.authenticate(token)?;
                state.moderation.list_by_status(&actor, status, page).await?
            }
            None if status == ArtistStatus::Ok => state.moderation.list_published(page).await?,
            None => anyhow::bail!("a moderator token is required for the {status} queue"),
        };
        Ok(page)
    })
    .await?;

    println!(
        "{} (page {} of {}, {} total):",
        status,
        artists.page,
        artists.total_pages().max(1),
        artists.total_elements
    );
    for artist in &artists.content {
        println!(
            "  {} - {} (owner {} / {})",
            artist.id, artist.profile.name, artist.owner.id, artist.owner.name
        );
    }

    Ok(())
}

async fn approve(config: &ServerConfig, id: i64, token: &str) -> anyhow::Result<()> {
    let artist = with_state(config, |state| async move {
        let actor = state.authenticate(token)?;
        Ok(state.artists.approve(id, &actor).await?)
    })
    .await?;

    println!("{} - {} is now {}", artist.id, artist.profile.name, artist.status);
    Ok(())
}
