//! The seam between the vote controller and the server.
mod http;

pub use http::HttpVoteApi;

use std::collections::HashMap;

use async_trait::async_trait;
use review_votes_shared::types::{CastOutcome, RemoveOutcome, VoteDirection, VoteTally};
use uuid::Uuid;

use crate::errors::ClientError;

/// Operations the controller needs from the vote resource.
///
/// Implementations must report any non-2xx or `success: false` answer as an
/// error; the controller never assumes partial success.
#[async_trait]
pub trait VoteApi: Send + Sync {
    /// Casts (or toggles) a vote and returns the server's canonical outcome.
    async fn cast_vote(&self, review_id: Uuid, direction: VoteDirection) -> Result<CastOutcome, ClientError>;

    /// Removes the caller's vote on a review.
    async fn remove_vote(&self, review_id: Uuid) -> Result<RemoveOutcome, ClientError>;

    /// Fetches the caller's direction on each review; unvoted reviews are absent.
    async fn fetch_votes(&self, review_ids: &[Uuid]) -> Result<HashMap<Uuid, VoteDirection>, ClientError>;

    /// Fetches helpful/unhelpful tallies. Transports without a counts endpoint
    /// return an empty map, which leaves local tallies untouched.
    async fn fetch_counts(&self, _review_ids: &[Uuid]) -> Result<HashMap<Uuid, VoteTally>, ClientError> {
        Ok(HashMap::new())
    }
}
