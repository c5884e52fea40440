//! # Vote Ledger
//!
//! Applies upvote/downvote intents against a post's two voter sets and
//! derives scores. The voter is always an authenticated [`UserHandle`]:
//! unauthenticated callers are rejected at the HTTP boundary before any
//! ledger state is touched, and the signatures here make the requirement
//! visible in the types.

use std::sync::Arc;

use domains::{Error, PostRepo, Result, UserHandle, VoteDirection, VoteStore};
use uuid::Uuid;

pub struct VoteLedger {
    posts: Arc<dyn PostRepo>,
    votes: Arc<dyn VoteStore>,
}

impl VoteLedger {
    pub fn new(posts: Arc<dyn PostRepo>, votes: Arc<dyn VoteStore>) -> Self {
        Self { posts, votes }
    }

    /// Toggle-off / switch / cast an upvote for `voter` on `post_id`.
    pub async fn apply_upvote(&self, voter: &UserHandle, post_id: Uuid) -> Result<()> {
        self.apply(voter, post_id, VoteDirection::Up).await
    }

    /// Mirror image of [`Self::apply_upvote`].
    pub async fn apply_downvote(&self, voter: &UserHandle, post_id: Uuid) -> Result<()> {
        self.apply(voter, post_id, VoteDirection::Down).await
    }

    async fn apply(&self, voter: &UserHandle, post_id: Uuid, intent: VoteDirection) -> Result<()> {
        // The post must exist before the vote sets are touched.
        if self.posts.by_id(post_id).await?.is_none() {
            return Err(Error::NotFound("post", post_id.to_string()));
        }

        // Read + resolve + write happen inside one store transaction; the
        // (post, voter) uniqueness constraint is the backstop against two
        // concurrent intents both observing "not voted".
        let op = self.votes.apply(post_id, voter.id, intent).await?;
        tracing::debug!(voter = %voter.username, post = %post_id, ?op, "vote applied");
        Ok(())
    }

    /// Current score of a post, computed on demand.
    pub async fn score(&self, post_id: Uuid) -> Result<i64> {
        if self.posts.by_id(post_id).await?.is_none() {
            return Err(Error::NotFound("post", post_id.to_string()));
        }
        self.votes.score(post_id).await
    }
}
