//! # Feed Composer
//!
//! Produces ordered, paginated post views for the three feed shapes:
//! the global feed, one community's feed, and one author's feed.
//! Page size is fixed; out-of-range page requests clamp instead of erroring.

use std::sync::Arc;

use domains::{
    clamp_page, total_pages, AccountRepo, Community, CommunityRepo, Error, FeedScope, Page,
    PostRepo, PostView, Result, User, FEED_PAGE_SIZE,
};

pub struct FeedComposer {
    posts: Arc<dyn PostRepo>,
    communities: Arc<dyn CommunityRepo>,
    accounts: Arc<dyn AccountRepo>,
}

impl FeedComposer {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        communities: Arc<dyn CommunityRepo>,
        accounts: Arc<dyn AccountRepo>,
    ) -> Self {
        Self {
            posts,
            communities,
            accounts,
        }
    }

    /// Every post on the site, newest first.
    pub async fn global(&self, page: u64) -> Result<Page<PostView>> {
        self.compose(FeedScope::Global, page).await
    }

    /// One community's posts; `NotFound` for an unknown slug.
    pub async fn community(&self, slug: &str, page: u64) -> Result<(Community, Page<PostView>)> {
        let community = self
            .communities
            .by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound("community", slug.to_string()))?;
        let page = self.compose(FeedScope::Community(community.id), page).await?;
        Ok((community, page))
    }

    /// One author's posts; `NotFound` for an unknown username.
    pub async fn author(&self, username: &str, page: u64) -> Result<(User, Page<PostView>)> {
        let user = self
            .accounts
            .user_by_username(username)
            .await?
            .ok_or_else(|| Error::NotFound("user", username.to_string()))?;
        let page = self.compose(FeedScope::Author(user.id), page).await?;
        Ok((user, page))
    }

    async fn compose(&self, scope: FeedScope, requested: u64) -> Result<Page<PostView>> {
        let total = self.posts.count(&scope).await?;
        let pages = total_pages(total, FEED_PAGE_SIZE);
        let number = clamp_page(requested, pages);

        let items = if total == 0 {
            Vec::new()
        } else {
            let offset = (number - 1) * FEED_PAGE_SIZE;
            self.posts.list_page(&scope, FEED_PAGE_SIZE, offset).await?
        };

        Ok(Page::new(items, number, pages, total))
    }
}
