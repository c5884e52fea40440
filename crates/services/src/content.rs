//! # Content Lifecycle
//!
//! Create/edit/delete transitions for posts and comments. Authorship is
//! fixed from the authenticated identity at creation time and never
//! transferable; every mutation after that passes through the single
//! [`ensure_owner`] gate.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Comment, CommentRepo, CommentView, CommunityRepo, Error, FieldErrors, MediaStorage, Post,
    PostRepo, PostView, Result, Upload, UserHandle,
};
use uuid::Uuid;

/// Original schema caps the title column at 255 characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Fields accepted when creating a post.
#[derive(Debug, Default)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    /// Slug of the community to file the post under; `None` leaves the
    /// post unaffiliated.
    pub community_slug: Option<String>,
    pub image: Option<Upload>,
}

/// Caller-supplied editable fields; `None` leaves a field unchanged.
#[derive(Debug, Default)]
pub struct EditPost {
    pub title: Option<String>,
    /// `Some("")` clears the body, `Some(text)` replaces it.
    pub content: Option<String>,
}

/// The one ownership gate shared by every post and comment mutation.
///
/// Failures are security-relevant and logged as such.
pub fn ensure_owner(actor: &UserHandle, author_id: Uuid) -> Result<()> {
    if actor.id == author_id {
        Ok(())
    } else {
        tracing::warn!(actor = %actor.username, owner = %author_id, "ownership check failed");
        Err(Error::Forbidden("only the author may modify this"))
    }
}

/// Rejects uploads that are not images before they reach storage.
pub(crate) fn ensure_image(upload: &Upload, field: &'static str) -> Result<()> {
    if upload.content_type.type_() == mime::IMAGE {
        Ok(())
    } else {
        Err(FieldErrors::single(
            field,
            format!("unsupported content type {}", upload.content_type),
        ))
    }
}

fn normalize_body(content: Option<String>) -> Option<String> {
    content.and_then(|c| {
        let trimmed = c.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub struct ContentService {
    posts: Arc<dyn PostRepo>,
    comments: Arc<dyn CommentRepo>,
    communities: Arc<dyn CommunityRepo>,
    media: Arc<dyn MediaStorage>,
}

impl ContentService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        comments: Arc<dyn CommentRepo>,
        communities: Arc<dyn CommunityRepo>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            comments,
            communities,
            media,
        }
    }

    pub async fn create_post(&self, author: &UserHandle, new: NewPost) -> Result<Post> {
        let title = new.title.trim().to_string();
        let mut errors = FieldErrors::new();
        if title.is_empty() {
            errors.push("title", "may not be empty");
        } else if title.len() > MAX_TITLE_LEN {
            errors.push("title", format!("may not exceed {MAX_TITLE_LEN} characters"));
        }
        if let Some(upload) = &new.image {
            if let Err(Error::Validation(image_errors)) = ensure_image(upload, "image") {
                errors.errors.extend(image_errors.errors);
            }
        }
        errors.into_result()?;

        let community_id = match new.community_slug.as_deref().filter(|s| !s.is_empty()) {
            Some(slug) => Some(
                self.communities
                    .by_slug(slug)
                    .await?
                    .ok_or_else(|| Error::NotFound("community", slug.to_string()))?
                    .id,
            ),
            None => None,
        };

        // Validation is complete; only now does anything persist.
        let image_id = match new.image {
            Some(upload) => Some(self.media.save(upload.data, &upload.content_type).await?),
            None => None,
        };

        let post = Post {
            id: Uuid::now_v7(),
            title,
            content: normalize_body(new.content),
            community_id,
            author_id: author.id,
            image_id,
            created_at: Utc::now(),
        };
        self.posts.create(&post).await?;
        tracing::info!(post = %post.id, author = %author.username, "post created");
        Ok(post)
    }

    pub async fn edit_post(
        &self,
        actor: &UserHandle,
        post_id: Uuid,
        edit: EditPost,
    ) -> Result<Post> {
        let mut post = self
            .posts
            .by_id(post_id)
            .await?
            .ok_or_else(|| Error::NotFound("post", post_id.to_string()))?;
        ensure_owner(actor, post.author_id)?;

        if let Some(title) = edit.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(FieldErrors::single("title", "may not be empty"));
            }
            if title.len() > MAX_TITLE_LEN {
                return Err(FieldErrors::single(
                    "title",
                    format!("may not exceed {MAX_TITLE_LEN} characters"),
                ));
            }
            post.title = title;
        }
        if let Some(content) = edit.content {
            post.content = normalize_body(Some(content));
        }

        self.posts.update(&post).await?;
        Ok(post)
    }

    /// Permanent and immediate; comments and votes cascade in the store.
    pub async fn delete_post(&self, actor: &UserHandle, post_id: Uuid) -> Result<()> {
        let post = self
            .posts
            .by_id(post_id)
            .await?
            .ok_or_else(|| Error::NotFound("post", post_id.to_string()))?;
        ensure_owner(actor, post.author_id)?;
        self.posts.delete(post_id).await?;
        tracing::info!(post = %post_id, actor = %actor.username, "post deleted");
        Ok(())
    }

    /// Post detail: the denormalized view plus its comments, oldest first.
    pub async fn post_detail(&self, post_id: Uuid) -> Result<(PostView, Vec<CommentView>)> {
        let view = self
            .posts
            .view_by_id(post_id)
            .await?
            .ok_or_else(|| Error::NotFound("post", post_id.to_string()))?;
        let comments = self.comments.for_post(post_id).await?;
        Ok((view, comments))
    }

    pub async fn create_comment(
        &self,
        author: &UserHandle,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(FieldErrors::single("content", "may not be empty"));
        }
        if self.posts.by_id(post_id).await?.is_none() {
            return Err(Error::NotFound("post", post_id.to_string()));
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            content,
            author_id: author.id,
            post_id,
            created_at: Utc::now(),
        };
        self.comments.create(&comment).await?;
        Ok(comment)
    }

    pub async fn edit_comment(
        &self,
        actor: &UserHandle,
        comment_id: Uuid,
        content: String,
    ) -> Result<Comment> {
        let mut comment = self
            .comments
            .by_id(comment_id)
            .await?
            .ok_or_else(|| Error::NotFound("comment", comment_id.to_string()))?;
        ensure_owner(actor, comment.author_id)?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(FieldErrors::single("content", "may not be empty"));
        }
        comment.content = content;
        self.comments.update(&comment).await?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, actor: &UserHandle, comment_id: Uuid) -> Result<()> {
        let comment = self
            .comments
            .by_id(comment_id)
            .await?
            .ok_or_else(|| Error::NotFound("comment", comment_id.to_string()))?;
        ensure_owner(actor, comment.author_id)?;
        self.comments.delete(comment_id).await
    }
}
