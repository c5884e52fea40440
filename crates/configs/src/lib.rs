//! # configs
//!
//! Layered application configuration: baked-in defaults, then an optional
//! `config/threadit.toml`, then `THREADIT__*` environment variables
//! (double underscore separating sections, e.g.
//! `THREADIT__SERVER__PORT=9000`).

use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:threadit.db`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Wrapped in `SecretString` so it never shows
    /// up in debug output or logs.
    pub jwt_secret: SecretString,
    pub session_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory uploads land in.
    pub root: String,
    /// URL prefix the media directory is served under.
    pub url_prefix: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl AppConfig {
    /// Loads the layered configuration. Missing file layers are fine;
    /// a malformed layer is not.
    pub fn load() -> Result<Self, ConfigError> {
        let raw = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite:threadit.db")?
            // Development-only fallback; deployments override it.
            .set_default("auth.jwt_secret", "insecure-dev-secret-change-me")?
            .set_default("auth.session_ttl_minutes", 60_i64 * 24 * 7)?
            .set_default("media.root", "./data/media")?
            .set_default("media.url_prefix", "/media")?
            .set_default("media.max_upload_bytes", 5_i64 * 1024 * 1024)?
            .set_default("log.json", false)?
            .add_source(config::File::with_name("config/threadit").required(false))
            .add_source(
                config::Environment::with_prefix("THREADIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let cfg: AppConfig = raw.try_deserialize()?;
        tracing::debug!(addr = %cfg.server.bind_addr(), "configuration loaded");
        Ok(cfg)
    }
}
