//! threadit/crates/domains/src/lib.rs
//!
//! The central domain types and interface definitions for Threadit.

pub mod error;
pub mod models;
pub mod pagination;
pub mod ports;
pub mod votes;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use pagination::{clamp_page, parse_page_param, total_pages, Page, FEED_PAGE_SIZE};
pub use ports::*;
pub use votes::{resolve, VoteDirection, VoteOp};
