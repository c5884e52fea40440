//! # Vote Resolution
//!
//! A voter is in at most one of a post's two sets (upvoters, downvoters) at
//! any time. Re-stating the same intent retracts the vote; stating the
//! opposite intent switches it. The resolution is pure so the storage
//! adapter can apply read + resolve + write inside one transaction, with the
//! store's uniqueness constraint on (post, voter) as the backstop.

use serde::{Deserialize, Serialize};

/// Which of the two vote sets an intent targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Contribution to a post's score.
    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }
}

/// The write the store must perform for one vote intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOp {
    /// No standing vote: insert membership in the intended set.
    Cast(VoteDirection),
    /// Standing vote in the opposite set: move membership across.
    Switch(VoteDirection),
    /// Standing vote in the intended set: remove it (toggle-off).
    Retract,
}

/// Three-way resolution of a vote intent against the voter's standing vote.
pub fn resolve(current: Option<VoteDirection>, intent: VoteDirection) -> VoteOp {
    match current {
        Some(standing) if standing == intent => VoteOp::Retract,
        Some(_) => VoteOp::Switch(intent),
        None => VoteOp::Cast(intent),
    }
}
