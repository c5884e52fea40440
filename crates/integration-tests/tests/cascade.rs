//! Cascade rules and the full end-to-end walk: community → post → votes
//! → deletion, checked at every step.

use domains::{CommentRepo, Error, PostRepo};
use integration_tests::TestApp;

#[tokio::test]
async fn deleting_a_community_removes_posts_and_their_comments() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    app.communities.create(&alice, "Doomed", None).await.unwrap();
    let post_a = app.post(&alice, "first", Some("doomed")).await;
    let post_b = app.post(&bob, "second", Some("doomed")).await;
    let comment = app
        .content
        .create_comment(&bob, post_a.id, "a comment".into())
        .await
        .unwrap();
    // An unaffiliated post must survive the cascade.
    let bystander = app.post(&alice, "bystander", None).await;

    app.communities.delete(&admin, "doomed").await.unwrap();

    assert!(matches!(
        app.feed.community("doomed", 1).await,
        Err(Error::NotFound("community", _))
    ));
    for id in [post_a.id, post_b.id] {
        assert!(PostRepo::by_id(app.store.as_ref(), id)
            .await
            .unwrap()
            .is_none());
    }
    assert!(CommentRepo::by_id(app.store.as_ref(), comment.id)
        .await
        .unwrap()
        .is_none());
    assert!(PostRepo::by_id(app.store.as_ref(), bystander.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn subscriptions_die_with_the_community() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin").await;
    let alice = app.register("alice").await;

    app.communities.create(&alice, "Fleeting", None).await.unwrap();
    app.communities.subscribe(&alice, "fleeting").await.unwrap();
    assert_eq!(app.communities.subscriber_count("fleeting").await.unwrap(), 1);

    app.communities.delete(&admin, "fleeting").await.unwrap();
    // Recreating under the same name starts from zero subscribers.
    app.communities.create(&alice, "Fleeting", None).await.unwrap();
    assert_eq!(app.communities.subscriber_count("fleeting").await.unwrap(), 0);
}

/// The reference walk: create "gaming", post into it, toggle votes
/// through 1 → 0 → -1, then delete and verify the community is empty.
#[tokio::test]
async fn end_to_end_gaming_walkthrough() {
    let app = TestApp::new().await;
    let user_a = app.register("user-a").await;
    let user_b = app.register("user-b").await;

    let community = app
        .communities
        .create(&user_a, "gaming", None)
        .await
        .unwrap();
    assert_eq!(community.slug, "gaming");

    let post = app.post(&user_a, "Hello", Some("gaming")).await;

    app.votes.apply_upvote(&user_b, post.id).await.unwrap();
    assert_eq!(app.votes.score(post.id).await.unwrap(), 1);

    app.votes.apply_upvote(&user_b, post.id).await.unwrap();
    assert_eq!(app.votes.score(post.id).await.unwrap(), 0);

    app.votes.apply_downvote(&user_b, post.id).await.unwrap();
    assert_eq!(app.votes.score(post.id).await.unwrap(), -1);

    app.content.delete_post(&user_a, post.id).await.unwrap();
    let (_, page) = app.feed.community("gaming", 1).await.unwrap();
    assert_eq!(page.total_items, 0);
    assert!(page.items.is_empty());
}
