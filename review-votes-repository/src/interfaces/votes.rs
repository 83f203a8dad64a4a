//! This module defines the `VotesRepository` trait, which provides an interface
//! for interacting with the underlying data store for review votes.
//! It abstracts the point lookups and mutations the vote service relies on.
use chrono::{DateTime, Utc};
use review_votes_shared::types::{CallerIdentity, DisplayIdentity, Vote, VoteDirection, VoteTally};
use uuid::Uuid;
use crate::errors::VotesRepositoryError;

/// A trait that defines the interface for interacting with the votes data store.
///
/// Implementors must guarantee that at most one vote exists per
/// `(review_id, caller_identity)` pair, rejecting a duplicate insert with
/// `VotesRepositoryError::Conflict` rather than storing a second row.
#[async_trait::async_trait]
pub trait VotesRepository: Send + Sync {
    /// Looks up the vote a caller holds on a review.
    ///
    /// # Arguments
    ///
    /// * `review_id` - The review the vote belongs to.
    /// * `caller_identity` - The durable identity of the voter.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the caller holds no vote; this is not an error.
    async fn find_one(
        &self,
        review_id: Uuid,
        caller_identity: &CallerIdentity,
    ) -> Result<Option<Vote>, VotesRepositoryError>;

    /// Inserts a new vote.
    ///
    /// # Arguments
    ///
    /// * `vote` - The vote to persist.
    ///
    /// # Returns
    ///
    /// The stored vote, or `VotesRepositoryError::Conflict` if the caller
    /// already holds a vote on the review.
    async fn insert(&self, vote: &Vote) -> Result<Vote, VotesRepositoryError>;

    /// Changes the direction of an existing vote in place.
    ///
    /// The display identity and the timestamp are refreshed together with the
    /// direction.
    ///
    /// # Arguments
    ///
    /// * `vote_id` - The id of the vote to update.
    /// * `direction` - The new direction.
    /// * `display_identity` - The refreshed anonymous display token.
    /// * `voted_at` - The new last-modified timestamp.
    ///
    /// # Returns
    ///
    /// The updated vote, or `VotesRepositoryError::NotFound` if it no longer exists.
    async fn update_direction(
        &self,
        vote_id: Uuid,
        direction: VoteDirection,
        display_identity: &DisplayIdentity,
        voted_at: DateTime<Utc>,
    ) -> Result<Vote, VotesRepositoryError>;

    /// Physically deletes a vote. Deleting a missing vote succeeds.
    async fn delete(&self, vote_id: Uuid) -> Result<(), VotesRepositoryError>;

    /// Retrieves the votes a caller holds on any of the given reviews.
    ///
    /// # Arguments
    ///
    /// * `review_ids` - Reviews to look up (an empty slice yields an empty result).
    /// * `caller_identity` - The durable identity of the voter.
    async fn find_many(
        &self,
        review_ids: &[Uuid],
        caller_identity: &CallerIdentity,
    ) -> Result<Vec<Vote>, VotesRepositoryError>;

    /// Aggregates helpful and unhelpful tallies for the given reviews.
    ///
    /// Reviews without any vote are omitted from the result.
    async fn count_votes(
        &self,
        review_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, VoteTally)>, VotesRepositoryError>;
}
