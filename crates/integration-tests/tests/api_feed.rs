//! Feed endpoints: pagination semantics as seen by a client.

use axum::http::StatusCode;
use integration_tests::{web, TestApp};

#[tokio::test]
async fn page_parameter_is_forgiving_over_http() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    for i in 0..7 {
        app.post(&alice, &format!("post-{i}"), None).await;
    }
    let router = app.router();

    // Absent, garbage, zero, and negative all mean page 1.
    for uri in ["/feed", "/feed?page=abc", "/feed?page=0", "/feed?page=-2"] {
        let response = web::send(&router, web::bare("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = web::body_json(response).await;
        assert_eq!(body["number"], 1, "{uri}");
        assert_eq!(body["items"].as_array().unwrap().len(), 5, "{uri}");
        assert_eq!(body["has_next"], true);
    }

    // Far past the end clamps to the last page.
    let response = web::send(&router, web::bare("GET", "/feed?page=99", None)).await;
    let body = web::body_json(response).await;
    assert_eq!(body["number"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_prev"], true);
    assert_eq!(body["has_next"], false);
}

#[tokio::test]
async fn empty_site_still_serves_one_page() {
    let app = TestApp::new().await;
    let router = app.router();
    let response = web::send(&router, web::bare("GET", "/feed", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    assert_eq!(body["number"], 1);
    assert_eq!(body["total_pages"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn community_detail_bundles_feed_and_membership() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    app.communities.create(&alice, "Gaming", None).await.unwrap();
    app.communities.subscribe(&alice, "gaming").await.unwrap();
    app.post(&alice, "in gaming", Some("gaming")).await;
    let router = app.router();

    let response = web::send(
        &router,
        web::bare("GET", "/communities/gaming", Some(&app.token_for(&alice))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = web::body_json(response).await;
    assert_eq!(body["community"]["slug"], "gaming");
    assert_eq!(body["subscribers"], 1);
    assert_eq!(body["subscribed"], true);
    assert_eq!(body["feed"]["total_items"], 1);

    // Anonymous view of the same page.
    let response = web::send(&router, web::bare("GET", "/communities/gaming", None)).await;
    let body = web::body_json(response).await;
    assert_eq!(body["subscribed"], false);
}

#[tokio::test]
async fn unknown_feed_scopes_are_404() {
    let app = TestApp::new().await;
    let router = app.router();
    for uri in ["/communities/nope", "/users/nobody"] {
        let response = web::send(&router, web::bare("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
