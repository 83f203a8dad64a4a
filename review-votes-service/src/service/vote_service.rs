use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use review_votes_repository::{VotesRepository, VotesRepositoryError};
use review_votes_shared::types::{
    CallerIdentity, CastOutcome, CastVoteRequest, RemoveOutcome, RemoveVoteRequest, Vote,
    VoteAction, VoteDirection, VoteTally, VoteTransition,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::VoteServiceError;
use crate::identity::DisplayIdentityGenerator;

/// How many times a cast is re-resolved when concurrent requests keep moving
/// the stored row underneath it.
const MAX_CAST_ATTEMPTS: usize = 3;

/// `VoteService` is the server-side vote state machine.
///
/// It holds no mutable state of its own: every request re-reads the stored
/// vote and branches on it, and the repository's uniqueness constraint is what
/// keeps concurrent requests from producing duplicate rows.
pub struct VoteService {
    votes_repository: Arc<dyn VotesRepository>,
    display_identities: Arc<dyn DisplayIdentityGenerator>,
}

impl VoteService {
    /// Creates a new `VoteService` instance.
    ///
    /// # Arguments
    ///
    /// * `votes_repository` - The store holding one vote per `(review, caller)`.
    /// * `display_identities` - Generator for the anonymous token attached on every create/update.
    pub fn new(
        votes_repository: Arc<dyn VotesRepository>,
        display_identities: Arc<dyn DisplayIdentityGenerator>,
    ) -> Self {
        Self {
            votes_repository,
            display_identities,
        }
    }

    /// Casts a vote, or toggles/switches the one the caller already holds.
    ///
    /// | held      | requested | effect                     |
    /// |-----------|-----------|----------------------------|
    /// | none      | d         | insert, `created`          |
    /// | d         | d         | delete, `removed`          |
    /// | d         | !d        | update in place, `updated` |
    ///
    /// # Arguments
    ///
    /// * `caller_identity` - The resolved caller, `None` for unauthenticated requests.
    /// * `request` - The raw request carrying `review_id` and `vote_type`.
    ///
    /// # Errors
    ///
    /// * `VoteServiceError::AuthRequired` - No caller identity.
    /// * `VoteServiceError::Validation` - Missing or malformed `review_id` / `vote_type`.
    /// * `VoteServiceError::Store` - The repository failed.
    pub async fn cast_or_toggle(
        &self,
        caller_identity: Option<&CallerIdentity>,
        request: &CastVoteRequest,
    ) -> Result<CastOutcome, VoteServiceError> {
        let caller_identity = caller_identity.ok_or(VoteServiceError::AuthRequired)?;
        let review_id = parse_review_id(request.review_id.as_deref())?;
        let direction = parse_direction(request.vote_type.as_deref())?;

        self.apply_vote(caller_identity, review_id, direction).await
    }

    /// Resolves an already validated vote request against the stored state.
    pub async fn apply_vote(
        &self,
        caller_identity: &CallerIdentity,
        review_id: Uuid,
        direction: VoteDirection,
    ) -> Result<CastOutcome, VoteServiceError> {
        for attempt in 1..=MAX_CAST_ATTEMPTS {
            let existing = self.votes_repository.find_one(review_id, caller_identity).await?;

            let outcome = match existing {
                None => self.create_vote(caller_identity, review_id, direction).await?,
                Some(vote) => match VoteDirection::transition(Some(vote.direction), direction) {
                    VoteTransition::Remove(_) => {
                        self.votes_repository.delete(vote.id).await?;
                        Some(CastOutcome {
                            action: VoteAction::Removed,
                            direction: None,
                        })
                    }
                    VoteTransition::Switch { to, .. } | VoteTransition::Create(to) => self
                        .switch_vote(&vote, caller_identity, to)
                        .await?
                        .map(|_| CastOutcome {
                            action: VoteAction::Updated,
                            direction: Some(to),
                        }),
                },
            };

            if let Some(outcome) = outcome {
                info!(
                    review_id = %review_id,
                    action = ?outcome.action,
                    direction = ?outcome.direction,
                    "Vote applied"
                );
                return Ok(outcome);
            }

            debug!(review_id = %review_id, attempt, "Stored vote moved underneath request, retrying");
        }

        warn!(review_id = %review_id, "Giving up on vote after repeated conflicts");
        Err(VotesRepositoryError::Conflict {
            review_id,
            caller_identity: caller_identity.to_string(),
        }
        .into())
    }

    /// Inserts a new vote. A racing insert for the same pair is retried as an
    /// update of the row that won.
    ///
    /// Returns `Ok(None)` when the winning row disappeared before it could be
    /// updated, in which case the caller re-resolves from scratch.
    async fn create_vote(
        &self,
        caller_identity: &CallerIdentity,
        review_id: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<CastOutcome>, VoteServiceError> {
        let vote = Vote::new(
            review_id,
            caller_identity.clone(),
            self.display_identities.next_display_identity(caller_identity),
            direction,
            Utc::now(),
        );

        match self.votes_repository.insert(&vote).await {
            Ok(_) => Ok(Some(CastOutcome {
                action: VoteAction::Created,
                direction: Some(direction),
            })),
            Err(VotesRepositoryError::Conflict { .. }) => {
                debug!(review_id = %review_id, "Concurrent insert detected, retrying as update");
                let Some(winner) = self.votes_repository.find_one(review_id, caller_identity).await? else {
                    return Ok(None);
                };
                Ok(self
                    .switch_vote(&winner, caller_identity, direction)
                    .await?
                    .map(|_| CastOutcome {
                        action: VoteAction::Updated,
                        direction: Some(direction),
                    }))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Points an existing vote at `direction`, refreshing its display identity
    /// and timestamp. `Ok(None)` means the row was deleted concurrently.
    async fn switch_vote(
        &self,
        vote: &Vote,
        caller_identity: &CallerIdentity,
        direction: VoteDirection,
    ) -> Result<Option<Vote>, VoteServiceError> {
        let display_identity = self.display_identities.next_display_identity(caller_identity);
        match self
            .votes_repository
            .update_direction(vote.id, direction, &display_identity, Utc::now())
            .await
        {
            Ok(updated) => Ok(Some(updated)),
            Err(VotesRepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the caller's vote on a review.
    ///
    /// Removing a vote that does not exist succeeds: the caller ends up in the
    /// state they asked for either way.
    ///
    /// # Errors
    ///
    /// * `VoteServiceError::AuthRequired` - No caller identity.
    /// * `VoteServiceError::Validation` - Missing or malformed `review_id`.
    /// * `VoteServiceError::Store` - The repository failed.
    pub async fn remove(
        &self,
        caller_identity: Option<&CallerIdentity>,
        request: &RemoveVoteRequest,
    ) -> Result<RemoveOutcome, VoteServiceError> {
        let caller_identity = caller_identity.ok_or(VoteServiceError::AuthRequired)?;
        let review_id = parse_review_id(request.review_id.as_deref())?;

        match self.votes_repository.find_one(review_id, caller_identity).await? {
            Some(vote) => {
                self.votes_repository.delete(vote.id).await?;
                info!(review_id = %review_id, "Vote deleted");
            }
            None => debug!(review_id = %review_id, "No vote to delete"),
        }

        Ok(RemoveOutcome {
            action: VoteAction::Deleted,
        })
    }

    /// Looks up the caller's direction on each of the given reviews.
    ///
    /// Unauthenticated callers get an empty map so anonymous viewers can still
    /// list reviews. Reviews the caller has not voted on are absent.
    pub async fn batch_get_votes(
        &self,
        caller_identity: Option<&CallerIdentity>,
        review_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteDirection>, VoteServiceError> {
        let Some(caller_identity) = caller_identity else {
            return Ok(HashMap::new());
        };

        let votes = self.votes_repository.find_many(review_ids, caller_identity).await?;
        Ok(votes
            .into_iter()
            .map(|vote| (vote.review_id, vote.direction))
            .collect())
    }

    /// Aggregates helpful/unhelpful tallies for the given reviews.
    ///
    /// Every requested review is present in the result; reviews without votes
    /// map to an empty tally.
    pub async fn batch_get_counts(
        &self,
        review_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteTally>, VoteServiceError> {
        let mut counts: HashMap<Uuid, VoteTally> = review_ids
            .iter()
            .map(|review_id| (*review_id, VoteTally::default()))
            .collect();
        counts.extend(self.votes_repository.count_votes(review_ids).await?);
        Ok(counts)
    }
}

/// Parses a single review id.
pub fn parse_review_id(raw: Option<&str>) -> Result<Uuid, VoteServiceError> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| VoteServiceError::validation("review_id is required"))?;
    Uuid::parse_str(raw).map_err(|_| VoteServiceError::validation(format!("Invalid review_id: {raw}")))
}

/// Parses a requested vote direction.
pub fn parse_direction(raw: Option<&str>) -> Result<VoteDirection, VoteServiceError> {
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| VoteServiceError::validation("vote_type is required"))?;
    raw.parse::<VoteDirection>()
        .map_err(|_| VoteServiceError::validation("vote_type must be 'helpful' or 'unhelpful'"))
}

/// Parses a comma-separated list of review ids, dropping duplicates while
/// keeping the first-seen order.
pub fn parse_review_ids(raw: Option<&str>) -> Result<Vec<Uuid>, VoteServiceError> {
    let raw = raw
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| VoteServiceError::validation("review_ids parameter is required"))?;

    let mut review_ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let review_id = Uuid::parse_str(part)
            .map_err(|_| VoteServiceError::validation(format!("Invalid review_id: {part}")))?;
        if !review_ids.contains(&review_id) {
            review_ids.push(review_id);
        }
    }

    if review_ids.is_empty() {
        return Err(VoteServiceError::validation("review_ids parameter is required"));
    }
    Ok(review_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_ids_deduplicates_and_trims() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!(" {a}, {b} ,{a},");
        assert_eq!(parse_review_ids(Some(&raw)).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_parse_review_ids_requires_a_value() {
        assert!(matches!(parse_review_ids(None), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_review_ids(Some("")), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_review_ids(Some(" , ,")), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_review_ids(Some("not-a-uuid")), Err(VoteServiceError::Validation(_))));
    }

    #[test]
    fn test_parse_direction_rejects_unknown_values() {
        assert_eq!(parse_direction(Some("helpful")).unwrap(), VoteDirection::Helpful);
        assert!(matches!(parse_direction(Some("maybe")), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_direction(None), Err(VoteServiceError::Validation(_))));
    }

    #[test]
    fn test_parse_review_id_requires_uuid() {
        assert!(matches!(parse_review_id(None), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_review_id(Some("  ")), Err(VoteServiceError::Validation(_))));
        assert!(matches!(parse_review_id(Some("42")), Err(VoteServiceError::Validation(_))));
    }
}
