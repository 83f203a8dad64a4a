//! Anonymous display identity generation.
//!
//! The service asks for a fresh display token on every create or update. The
//! token never participates in vote uniqueness.
mod rotating;

pub use rotating::{DEFAULT_ROTATION_SECS, RotatingDisplayIdentity};

use review_votes_shared::types::{CallerIdentity, DisplayIdentity};

/// Produces the public anonymous token shown next to a caller's vote.
pub trait DisplayIdentityGenerator: Send + Sync {
    fn next_display_identity(&self, caller_identity: &CallerIdentity) -> DisplayIdentity;
}
