//! # Core Traits (Ports)
//!
//! Contracts between the application services and the adapters that
//! persist, authenticate, and store media. Any adapter must implement
//! these to be wired into the binary.
//!
//! With the `testing` feature (or inside this crate's own tests), every
//! port also generates a mockall `MockXxx` type.

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Comment, CommentView, Community, FeedScope, Post, PostView, Profile, User, UserHandle,
};
use crate::votes::{VoteDirection, VoteOp};

/// Persistence contract for users and their profiles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Inserts the user row and its blank profile in one transaction.
    ///
    /// A profile is never created independently and exists exactly once per
    /// user, so creation is a single explicit step here rather than a
    /// side-effect channel.
    async fn create_user_with_profile(&self, user: &User) -> Result<()>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// `(username_taken, email_taken)` for pre-insert validation messages.
    async fn credentials_taken(&self, username: &str, email: &str) -> Result<(bool, bool)>;

    async fn profile_of(&self, user_id: Uuid) -> Result<Option<Profile>>;
    async fn update_profile(&self, profile: &Profile) -> Result<()>;

    /// Removes the user; posts, comments, votes, and subscriptions cascade.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for communities and subscriptions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommunityRepo: Send + Sync {
    async fn create(&self, community: &Community) -> Result<()>;
    async fn by_slug(&self, slug: &str) -> Result<Option<Community>>;
    async fn name_taken(&self, name: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<Community>>;

    /// Removes the community; its posts (and their comments) cascade.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Records membership; already-subscribed is a no-op.
    async fn subscribe(&self, user_id: Uuid, community_id: Uuid) -> Result<()>;
    /// Removes membership; not-subscribed is a no-op.
    async fn unsubscribe(&self, user_id: Uuid, community_id: Uuid) -> Result<()>;
    async fn is_subscribed(&self, user_id: Uuid, community_id: Uuid) -> Result<bool>;
    async fn subscriber_count(&self, community_id: Uuid) -> Result<u64>;
}

/// Persistence contract for posts and feed queries.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, post: &Post) -> Result<()>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Post>>;
    /// Denormalized shape with author, community, and on-demand score.
    async fn view_by_id(&self, id: Uuid) -> Result<Option<PostView>>;
    async fn update(&self, post: &Post) -> Result<()>;
    /// Removes the post; comments and votes cascade.
    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn count(&self, scope: &FeedScope) -> Result<u64>;
    /// One feed page, newest-creation-first.
    async fn list_page(&self, scope: &FeedScope, limit: u64, offset: u64) -> Result<Vec<PostView>>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<()>;
    async fn by_id(&self, id: Uuid) -> Result<Option<Comment>>;
    async fn update(&self, comment: &Comment) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// All comments on a post, oldest first.
    async fn for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>>;
}

/// Persistence contract for the per-post vote sets.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Applies one vote intent atomically: reads the voter's standing vote,
    /// resolves it via [`crate::votes::resolve`], and performs the write,
    /// all inside a single transaction. Returns the op that was applied.
    async fn apply(&self, post_id: Uuid, voter_id: Uuid, intent: VoteDirection) -> Result<VoteOp>;

    async fn direction_of(&self, post_id: Uuid, voter_id: Uuid)
        -> Result<Option<VoteDirection>>;

    /// `|upvoters| - |downvoters|`, computed on demand.
    async fn score(&self, post_id: Uuid) -> Result<i64>;
}

/// Media storage contract for post images and avatars.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores the blob and returns a stable media id.
    async fn save(&self, data: Bytes, content_type: &Mime) -> Result<String>;
    /// Public URL of the original media.
    fn url(&self, media_id: &str) -> String;
    /// Public URL of the thumbnail.
    fn thumbnail_url(&self, media_id: &str) -> String;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Session token contract: issue at login, verify per request.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionTokens: Send + Sync {
    fn issue(&self, user: &UserHandle) -> Result<String>;
    /// `Unauthenticated` for malformed, forged, or expired tokens.
    fn verify(&self, token: &str) -> Result<UserHandle>;
}
