//! # SQLite store
//!
//! Maps the relational schema onto the `domains` models. One `SqliteStore`
//! implements every repository port; the schema's foreign keys carry the
//! cascade rules and its UNIQUE constraints back the uniqueness invariants
//! (username, email, community name/slug, one subscription per pair, one
//! vote per voter per post).

mod accounts;
mod comments;
mod communities;
mod posts;
mod votes;

use std::str::FromStr;

use domains::Error;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

/// Applied at connect time; `IF NOT EXISTS` keeps reconnects harmless.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BLOB PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id   BLOB PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    bio       TEXT NOT NULL DEFAULT '',
    location  TEXT NOT NULL DEFAULT '',
    avatar_id TEXT
);

CREATE TABLE IF NOT EXISTS communities (
    id          BLOB PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id           BLOB PRIMARY KEY,
    title        TEXT NOT NULL,
    content      TEXT,
    community_id BLOB REFERENCES communities(id) ON DELETE CASCADE,
    author_id    BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    image_id     TEXT,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_created   ON posts(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_posts_community ON posts(community_id);
CREATE INDEX IF NOT EXISTS idx_posts_author    ON posts(author_id);

CREATE TABLE IF NOT EXISTS comments (
    id         BLOB PRIMARY KEY,
    content    TEXT NOT NULL,
    author_id  BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    post_id    BLOB NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id);

CREATE TABLE IF NOT EXISTS subscriptions (
    user_id      BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    community_id BLOB NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    PRIMARY KEY (user_id, community_id)
);

CREATE TABLE IF NOT EXISTS post_votes (
    post_id    BLOB NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    voter_id   BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    direction  INTEGER NOT NULL CHECK (direction IN (-1, 1)),
    created_at TEXT NOT NULL,
    PRIMARY KEY (post_id, voter_id)
);
"#;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies the
    /// schema. Foreign-key enforcement is switched on per connection.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // In-memory databases exist per connection, so the pool must not
        // hand out a second one.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        tracing::debug!(url, "sqlite store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Helpers for UUID conversion: ids are stored as 16-byte blobs.
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

/// UNIQUE violations become `Conflict`; everything else is infrastructure.
pub(crate) fn map_db_err(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::Conflict(db.message().to_string())
        }
        _ => Error::Internal(anyhow::Error::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{AccountRepo, CommunityRepo, Community, Error, User};

    pub(crate) async fn mem_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    pub(crate) fn user(name: &str) -> User {
        User {
            id: Uuid::now_v7(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "x".into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn community(name: &str, slug: &str) -> Community {
        Community {
            id: Uuid::now_v7(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn schema_applies_twice_without_error() {
        let store = mem_store().await;
        sqlx::raw_sql(SCHEMA).execute(store.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_username_maps_to_conflict() {
        let store = mem_store().await;
        store.create_user_with_profile(&user("alice")).await.unwrap();
        let err = store
            .create_user_with_profile(&user("alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_maps_to_conflict() {
        let store = mem_store().await;
        store.create(&community("Gaming", "gaming")).await.unwrap();
        let err = store
            .create(&community("gaming", "gaming"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }
}
