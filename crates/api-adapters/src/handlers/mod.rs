//! # Handlers
//!
//! One module per resource area. Handlers stay thin: extract, call the
//! service, serialize.

pub mod accounts;
pub mod comments;
pub mod communities;
pub mod feeds;
pub mod posts;
pub mod votes;

use domains::parse_page_param;
use serde::Deserialize;

/// `?page=` is forgiving: absent, non-numeric, and out-of-range values
/// all resolve to a valid page instead of erroring.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub page: Option<String>,
}

impl FeedQuery {
    pub fn page(&self) -> u64 {
        parse_page_param(self.page.as_deref())
    }
}
