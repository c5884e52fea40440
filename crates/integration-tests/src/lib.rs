//! Shared fixtures for the integration test targets: an in-memory store
//! wired through the real services, plus (behind `web-axum`) the full
//! router for request-level tests.

use std::sync::Arc;

use auth_adapters::{Argon2PasswordHasher, JwtSessions};
use domains::{AccountRepo, User, UserHandle};
use services::{
    AccountService, CommunityService, ContentService, FeedComposer, NewPost, Registration,
    VoteLedger,
};
use storage_adapters::{LocalMediaStore, SqliteStore};

pub struct TestApp {
    pub store: Arc<SqliteStore>,
    pub accounts: Arc<AccountService>,
    pub communities: Arc<CommunityService>,
    pub content: Arc<ContentService>,
    pub feed: Arc<FeedComposer>,
    pub votes: Arc<VoteLedger>,
    pub sessions: Arc<JwtSessions>,
}

impl TestApp {
    /// Fresh in-memory database, throwaway media directory, real services.
    pub async fn new() -> Self {
        let store = Arc::new(
            SqliteStore::connect("sqlite::memory:")
                .await
                .expect("in-memory sqlite"),
        );

        let mut media_root = std::env::temp_dir();
        media_root.push(format!("threadit-tests-{}", uuid::Uuid::now_v7()));
        let media = Arc::new(LocalMediaStore::new(
            media_root,
            "/media".into(),
            5 * 1024 * 1024,
        ));

        let hasher = Arc::new(Argon2PasswordHasher::new());
        let sessions = Arc::new(JwtSessions::new(
            b"integration-test-secret",
            chrono::Duration::minutes(60),
        ));

        Self {
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
                media,
            )),
            feed: Arc::new(FeedComposer::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            votes: Arc::new(VoteLedger::new(store.clone(), store.clone())),
            sessions,
            store,
        }
    }

    /// Registers a user through the real registration path.
    pub async fn register(&self, name: &str) -> UserHandle {
        self.accounts
            .register(Registration {
                username: name.into(),
                email: format!("{name}@example.com"),
                password: format!("{name}-password"),
            })
            .await
            .expect("registration")
    }

    /// Inserts an admin directly; registration never grants the flag.
    pub async fn register_admin(&self, name: &str) -> UserHandle {
        let user = User {
            id: uuid::Uuid::now_v7(),
            username: name.into(),
            email: format!("{name}@example.com"),
            password_hash: "unused".into(),
            is_admin: true,
            created_at: chrono::Utc::now(),
        };
        self.store
            .create_user_with_profile(&user)
            .await
            .expect("admin insert");
        user.handle()
    }

    pub fn token_for(&self, user: &UserHandle) -> String {
        use domains::SessionTokens;
        self.sessions.issue(user).expect("token")
    }

    /// Title-only post, optionally filed under a community slug.
    pub async fn post(
        &self,
        author: &UserHandle,
        title: &str,
        community: Option<&str>,
    ) -> domains::Post {
        self.content
            .create_post(
                author,
                NewPost {
                    title: title.into(),
                    content: None,
                    community_slug: community.map(String::from),
                    image: None,
                },
            )
            .await
            .expect("post creation")
    }

    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        api_adapters::router(api_adapters::ApiState {
            accounts: self.accounts.clone(),
            communities: self.communities.clone(),
            content: self.content.clone(),
            feed: self.feed.clone(),
            votes: self.votes.clone(),
            sessions: self.sessions.clone(),
            metrics: api_adapters::metrics::Metrics::new(),
        })
    }
}

/// Request plumbing for the router tests.
#[cfg(feature = "web-axum")]
pub mod web {
    use axum::body::Body;
    use axum::http::{header, Request, Response};
    use tower::ServiceExt;

    pub async fn send(router: &axum::Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.expect("infallible")
    }

    /// Bodyless request, optionally authenticated.
    pub fn bare(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).expect("request")
    }

    /// JSON-bodied request, optionally authenticated.
    pub fn json(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
            .body(Body::from(serde_json::to_vec(body).expect("serialize")))
            .expect("request")
    }

    /// Minimal multipart body for the post-creation form.
    pub fn multipart_post(
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
    ) -> Request<Body> {
        const BOUNDARY: &str = "threadit-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }
}
