//! Post and comment endpoints over the wire.

use axum::http::StatusCode;
use integration_tests::{web, TestApp};
use serde_json::json;

#[tokio::test]
async fn multipart_create_then_detail() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    app.communities.create(&alice, "Gaming", None).await.unwrap();
    let token = app.token_for(&alice);
    let router = app.router();

    let response = web::send(
        &router,
        web::multipart_post(
            "/posts",
            &token,
            &[
                ("title", "Hello from the form"),
                ("content", "with a body"),
                ("community", "gaming"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = web::body_json(response).await;
    let id = created["id"].as_str().expect("post id");
    assert_eq!(created["title"], "Hello from the form");

    let response = web::send(&router, web::bare("GET", &format!("/posts/{id}"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    assert_eq!(body["post"]["author"], "alice");
    assert_eq!(body["post"]["community"]["slug"], "gaming");
    assert_eq!(body["post"]["score"], 0);
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_title_is_a_422_with_field_errors() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let token = app.token_for(&alice);
    let router = app.router();

    let response = web::send(
        &router,
        web::multipart_post("/posts", &token, &[("title", "   ")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = web::body_json(response).await;
    assert_eq!(body["fields"][0]["field"], "title");
}

#[tokio::test]
async fn edits_are_author_only_over_http() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let mallory = app.register("mallory").await;
    let post = app.post(&alice, "Original", None).await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "PATCH",
            &format!("/posts/{}", post.id),
            Some(&app.token_for(&mallory)),
            &json!({ "title": "Hijacked" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = web::send(
        &router,
        web::json(
            "PATCH",
            &format!("/posts/{}", post.id),
            Some(&app.token_for(&alice)),
            &json!({ "title": "Renamed" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(web::body_json(response).await["title"], "Renamed");
}

#[tokio::test]
async fn delete_requires_the_delete_method_and_the_author() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let mallory = app.register("mallory").await;
    let post = app.post(&alice, "Hello", None).await;
    let router = app.router();
    let uri = format!("/posts/{}", post.id);

    // Reads never destroy: GET on the resource leaves it intact.
    let response = web::send(&router, web::bare("GET", &uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = web::send(
        &router,
        web::bare("DELETE", &uri, Some(&app.token_for(&mallory))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = web::send(
        &router,
        web::bare("DELETE", &uri, Some(&app.token_for(&alice))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = web::send(&router, web::bare("GET", &uri, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_thread_through_the_detail_payload() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post = app.post(&alice, "Discuss", None).await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "POST",
            &format!("/posts/{}/comments", post.id),
            Some(&app.token_for(&bob)),
            &json!({ "content": "bob's take" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = web::send(
        &router,
        web::bare("GET", &format!("/posts/{}", post.id), None),
    )
    .await;
    let body = web::body_json(response).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"], "bob");
    assert_eq!(comments[0]["content"], "bob's take");
}

#[tokio::test]
async fn empty_comment_is_rejected_without_persisting() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let post = app.post(&alice, "Discuss", None).await;
    let router = app.router();

    let response = web::send(
        &router,
        web::json(
            "POST",
            &format!("/posts/{}/comments", post.id),
            Some(&app.token_for(&alice)),
            &json!({ "content": "   " }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let (_, comments) = app.content.post_detail(post.id).await.unwrap();
    assert!(comments.is_empty());
}
