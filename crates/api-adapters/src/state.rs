//! Shared state handed to every handler.

use std::sync::Arc;

use domains::SessionTokens;
use services::{AccountService, CommunityService, ContentService, FeedComposer, VoteLedger};

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct ApiState {
    pub accounts: Arc<AccountService>,
    pub communities: Arc<CommunityService>,
    pub content: Arc<ContentService>,
    pub feed: Arc<FeedComposer>,
    pub votes: Arc<VoteLedger>,
    pub sessions: Arc<dyn SessionTokens>,
    pub metrics: Metrics,
}
