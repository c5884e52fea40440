//! threadit/crates/services/src/lib.rs
//!
//! Application services: the logic between the HTTP adapters and the
//! persistence/auth/media ports defined in `domains`.

pub mod accounts;
pub mod communities;
pub mod content;
pub mod feed;
pub mod votes;

pub use accounts::{AccountService, ProfileEdit, Registration};
pub use communities::{slugify, CommunityService};
pub use content::{ensure_owner, ContentService, EditPost, NewPost};
pub use feed::FeedComposer;
pub use votes::VoteLedger;
