use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::types::{CallerIdentity, DisplayIdentity, VoteDirection};

/// Represents one caller's judgment on one review.
///
/// At most one `Vote` exists per `(review_id, caller_identity)` pair. The
/// `created_at` field is refreshed whenever the direction changes, so it
/// doubles as a last-modified timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: Uuid,
    pub review_id: Uuid,
    pub caller_identity: CallerIdentity,
    pub display_identity: DisplayIdentity,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Creates a new vote with a freshly generated id.
    pub fn new(
        review_id: Uuid,
        caller_identity: CallerIdentity,
        display_identity: DisplayIdentity,
        direction: VoteDirection,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            review_id,
            caller_identity,
            display_identity,
            direction,
            created_at,
        }
    }
}
