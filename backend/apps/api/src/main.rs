//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are
//! `feedback::FeedbackError`.

use anyhow::{Context, anyhow};
use axum::Router;
use feedback::domain::repository::SessionRepository;
use feedback::{BoardConfig, InMemoryBoardRepository, PgBoardRepository, board_router_generic};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,feedback=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = board_config()?;

    let board = match storage_backend(env::var("BOARD_STORAGE").ok().as_deref())? {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on exit");
            board_router_generic(InMemoryBoardRepository::new(), config)
        }
        StorageBackend::Postgres => {
            let repo = connect_postgres().await?;
            cleanup_sessions(&repo).await;
            board_router_generic(repo, config)
        }
    };

    // Build router
    let app = Router::new()
        .merge(board)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = env::var("BOARD_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BOARD_BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum StorageBackend {
    Postgres,
    Memory,
}

/// Parse `BOARD_STORAGE`; unset means Postgres
fn storage_backend(raw: Option<&str>) -> anyhow::Result<StorageBackend> {
    match raw.map(str::trim) {
        None | Some("postgres") => Ok(StorageBackend::Postgres),
        Some("memory") => Ok(StorageBackend::Memory),
        Some(other) => Err(anyhow!(
            "BOARD_STORAGE must be `postgres` or `memory`, got `{}`",
            other
        )),
    }
}

async fn connect_postgres() -> anyhow::Result<PgBoardRepository> {
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    Ok(PgBoardRepository::new(pool))
}

/// Startup cleanup; failures here must not prevent server startup
async fn cleanup_sessions(repo: &PgBoardRepository) {
    match repo.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }
}

fn board_config() -> anyhow::Result<BoardConfig> {
    let secret = env::var("BOARD_SESSION_SECRET").ok();

    let mut config = match (secret, cfg!(debug_assertions)) {
        (Some(secret_b64), _) => BoardConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..BoardConfig::default()
        },
        (None, true) => BoardConfig::development(),
        (None, false) => return Err(anyhow!("BOARD_SESSION_SECRET must be set in production")),
    };

    if let Ok(pepper) = env::var("BOARD_PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    if let Ok(secure) = env::var("BOARD_COOKIE_SECURE") {
        config.cookie_secure = matches!(secure.trim(), "1" | "true" | "yes");
    }

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = platform::crypto::from_base64(secret_b64.trim())
        .context("BOARD_SESSION_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow!("BOARD_SESSION_SECRET must decode to 32 bytes (got {})", bytes.len()))
}
