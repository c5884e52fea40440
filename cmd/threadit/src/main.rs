//! # Threadit Binary
//!
//! The entry point that assembles the application based on compile-time
//! features: SQLite persistence, local media storage, JWT sessions, and
//! the axum API.

use std::sync::Arc;

use anyhow::Context;
use configs::{AppConfig, LogConfig};
use secrecy::ExposeSecret;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use api_adapters::metrics::Metrics;
use api_adapters::ApiState;
use services::{AccountService, CommunityService, ContentService, FeedComposer, VoteLedger};

#[cfg(feature = "db-sqlite")]
use storage_adapters::SqliteStore;

#[cfg(feature = "media-local")]
use storage_adapters::LocalMediaStore;

#[cfg(feature = "auth-jwt")]
use auth_adapters::{Argon2PasswordHasher, JwtSessions};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = AppConfig::load().context("loading configuration")?;
    init_tracing(&cfg.log);

    // 1. Persistence
    #[cfg(feature = "db-sqlite")]
    let store = Arc::new(
        SqliteStore::connect(&cfg.database.url)
            .await
            .context("connecting to the database")?,
    );

    // 2. Media storage
    std::fs::create_dir_all(&cfg.media.root).context("creating the media root")?;
    #[cfg(feature = "media-local")]
    let media = Arc::new(LocalMediaStore::new(
        cfg.media.root.clone().into(),
        cfg.media.url_prefix.clone(),
        cfg.media.max_upload_bytes,
    ));

    // 3. Auth
    #[cfg(feature = "auth-jwt")]
    let hasher = Arc::new(Argon2PasswordHasher::new());
    #[cfg(feature = "auth-jwt")]
    let sessions = Arc::new(JwtSessions::new(
        cfg.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::minutes(cfg.auth.session_ttl_minutes),
    ));

    // 4. Services over the ports
    let state = ApiState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            hasher,
            sessions.clone(),
            media.clone(),
        )),
        communities: Arc::new(CommunityService::new(store.clone())),
        content: Arc::new(ContentService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            media.clone(),
        )),
        feed: Arc::new(FeedComposer::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        votes: Arc::new(VoteLedger::new(store.clone(), store.clone())),
        sessions,
        metrics: Metrics::new(),
    };

    // 5. Router plus static serving of the media directory
    let app = api_adapters::router(state)
        .nest_service(cfg.media.url_prefix.as_str(), ServeDir::new(&cfg.media.root));

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr())
        .await
        .with_context(|| format!("binding {}", cfg.server.bind_addr()))?;
    tracing::info!(addr = %cfg.server.bind_addr(), "threadit listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
