//! # Domain Models
//!
//! These structs represent the core entities of Threadit.
//! We use UUID v7 for time-ordered, globally unique identification.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use mime::Mime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// The password hash never leaves the process: it is skipped during
/// serialization so no API payload can accidentally carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Grants access to moderation-only operations (community deletion).
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity attached to requests once a session token is verified.
    pub fn handle(&self) -> UserHandle {
        UserHandle {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Authenticated-user handle carried through services.
///
/// Mutating operations take this by value or reference, so "who is acting"
/// is visible in every signature that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// Per-user profile, one-to-one with [`User`].
///
/// Created in the same transaction as its user and deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub bio: String,
    pub location: String,
    /// Media id of the avatar, if one was uploaded.
    pub avatar_id: Option<String>,
}

impl Profile {
    /// The empty profile every fresh account starts with.
    pub fn blank(user_id: Uuid) -> Self {
        Self {
            user_id,
            bio: String::new(),
            location: String::new(),
            avatar_id: None,
        }
    }
}

/// A topic community posts can be filed under (e.g., "gaming").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,
    /// Display name, unique across the site.
    pub name: String,
    /// URL slug derived from the name once at creation and never recomputed.
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A submission: a title, optional body text, optional image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// A post may carry only a title or image, so the body is optional.
    pub content: Option<String>,
    /// Posts may be unaffiliated with any community.
    pub community_id: Option<Uuid>,
    pub author_id: Uuid,
    /// Media id of the attached image, handled by `MediaStorage`.
    pub image_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A reply attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership link between a user and a community.
///
/// A given (user, community) pair exists at most once; the storage layer
/// enforces this with a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Denormalized post shape handed to the presentation layer.
///
/// Carries the derived score and the names a feed needs to render a row
/// without further lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: String,
    pub community: Option<CommunityRef>,
    /// `|upvoters| - |downvoters|`, computed on demand by the store.
    pub score: i64,
}

/// Minimal community reference embedded in feed rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityRef {
    pub name: String,
    pub slug: String,
}

/// Comment plus its author's username, for post detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: String,
}

/// An uploaded blob on its way to `MediaStorage`.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    pub content_type: Mime,
}

/// Which posts a feed query selects.
///
/// Scopes are resolved to ids by the feed composer before they reach the
/// store, so an unknown slug or username surfaces as `NotFound` instead of
/// an empty feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post on the site.
    Global,
    /// Posts filed under one community.
    Community(Uuid),
    /// Posts authored by one user.
    Author(Uuid),
}
