use serde::{Deserialize, Serialize};
use crate::types::VoteDirection;

/// What a vote mutation did to the persisted state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    /// A new vote row was inserted.
    Created,
    /// The existing vote row changed direction.
    Updated,
    /// The existing vote row was toggled off by casting the same direction again.
    Removed,
    /// The vote was explicitly removed.
    Deleted,
}

/// Canonical result of casting (or toggling) a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOutcome {
    pub action: VoteAction,
    /// Direction held after the mutation, `None` once the vote was toggled off.
    pub direction: Option<VoteDirection>,
}

/// Result of an explicit vote removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub action: VoteAction,
}
