//! Registration, login, and session enforcement over the wire.

use axum::http::StatusCode;
use integration_tests::{web, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_login_me_round_trip() {
    let app = TestApp::new().await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "correct horse"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = web::send(
        &router,
        web::json(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "alice", "password": "correct horse" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(body["user"]["username"], "alice");

    let response = web::send(&router, web::bare("GET", "/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn wrong_password_is_401() {
    let app = TestApp::new().await;
    app.register("alice").await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "alice", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_returns_field_errors() {
    let app = TestApp::new().await;
    app.register("alice").await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "correct horse"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = web::body_json(response).await;
    let fields: Vec<_> = body["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"username".to_string()));
    assert!(fields.contains(&"email".to_string()));
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let post = app.post(&alice, "Hello", None).await;
    let router = app.router();

    for token in [None, Some("garbage")] {
        let response = web::send(
            &router,
            web::bare("POST", &format!("/posts/{}/upvote", post.id), token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{token:?}");
    }
    // The vote sets were never touched.
    assert_eq!(app.votes.score(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn profile_endpoint_hides_the_email() {
    let app = TestApp::new().await;
    app.register("alice").await;
    let router = app.router();

    let response = web::send(&router, web::bare("GET", "/users/alice", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("email").is_none());
    assert!(body["profile"]["bio"].as_str().unwrap().is_empty());
}
