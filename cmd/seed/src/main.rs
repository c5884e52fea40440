//! Seeds a demo dataset into the configured database: a few accounts,
//! two communities, posts with comments, and enough votes to make the
//! feed ordering and scores worth looking at.

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use secrecy::ExposeSecret;

use auth_adapters::{Argon2PasswordHasher, JwtSessions};
use configs::AppConfig;
use domains::{AccountRepo, PasswordHasher as _, User, UserHandle};
use services::{
    AccountService, CommunityService, ContentService, FeedComposer, NewPost, Registration,
    VoteLedger,
};
use storage_adapters::{LocalMediaStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();
    let cfg = AppConfig::load().context("loading configuration")?;

    let store = Arc::new(SqliteStore::connect(&cfg.database.url).await?);
    if store.user_by_username("admin").await?.is_some() {
        bail!("database already seeded (user 'admin' exists)");
    }

    let hasher = Arc::new(Argon2PasswordHasher::new());
    let sessions = Arc::new(JwtSessions::new(
        cfg.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::minutes(cfg.auth.session_ttl_minutes),
    ));
    let media = Arc::new(LocalMediaStore::new(
        cfg.media.root.clone().into(),
        cfg.media.url_prefix.clone(),
        cfg.media.max_upload_bytes,
    ));

    let accounts = AccountService::new(
        store.clone(),
        hasher.clone(),
        sessions,
        media.clone(),
    );
    let communities = CommunityService::new(store.clone());
    let content = ContentService::new(store.clone(), store.clone(), store.clone(), media);
    let votes = VoteLedger::new(store.clone(), store.clone());
    let feed = FeedComposer::new(store.clone(), store.clone(), store.clone());

    // The admin goes through the repo directly: registration never hands
    // out the admin flag.
    let admin = User {
        id: uuid::Uuid::now_v7(),
        username: "admin".into(),
        email: "admin@example.com".into(),
        password_hash: hasher.hash("admin-password")?,
        is_admin: true,
        created_at: Utc::now(),
    };
    store.create_user_with_profile(&admin).await?;

    let mut users: Vec<UserHandle> = Vec::new();
    for name in ["alice", "bob", "carol"] {
        let handle = accounts
            .register(Registration {
                username: name.into(),
                email: format!("{name}@example.com"),
                password: format!("{name}-password"),
            })
            .await?;
        users.push(handle);
    }

    let gaming = communities.create(&users[0], "Gaming", None).await?;
    communities
        .create(&users[1], "Rust Programming", Some("All things rustc".into()))
        .await?;

    for user in &users {
        communities.subscribe(user, &gaming.slug).await?;
    }

    let mut posts = Vec::new();
    for (author, title, community) in [
        (&users[0], "Hello threadit", None),
        (&users[1], "Favorite co-op games?", Some("gaming")),
        (&users[2], "Borrow checker appreciation thread", Some("rust-programming")),
        (&users[0], "Patch notes discussion", Some("gaming")),
    ] {
        let post = content
            .create_post(
                author,
                NewPost {
                    title: title.into(),
                    content: Some(format!("{title}: seeded body text.")),
                    community_slug: community.map(String::from),
                    image: None,
                },
            )
            .await?;
        posts.push(post);
    }

    content
        .create_comment(&users[1], posts[0].id, "First!".into())
        .await?;
    content
        .create_comment(&users[2], posts[0].id, "Welcome aboard.".into())
        .await?;

    for post in &posts {
        votes.apply_upvote(&users[0], post.id).await?;
    }
    votes.apply_upvote(&users[1], posts[2].id).await?;
    votes.apply_downvote(&users[2], posts[3].id).await?;

    let page = feed.global(1).await?;
    tracing::info!(
        posts = page.total_items,
        users = users.len() + 1,
        "seed complete"
    );
    Ok(())
}
