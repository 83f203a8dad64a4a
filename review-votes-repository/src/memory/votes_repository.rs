use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use review_votes_shared::types::{CallerIdentity, DisplayIdentity, Vote, VoteDirection, VoteTally};
use uuid::Uuid;
use crate::{VotesRepository, VotesRepositoryError};

type VoteKey = (Uuid, CallerIdentity);

/// Mutex-guarded vote table keyed by `(review_id, caller_identity)`.
#[derive(Default)]
pub struct InMemoryVotesRepository {
    votes: Mutex<HashMap<VoteKey, Vote>>,
}

impl InMemoryVotesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored votes across all reviews and callers.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<VoteKey, Vote>> {
        self.votes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl VotesRepository for InMemoryVotesRepository {
    async fn find_one(
        &self,
        review_id: Uuid,
        caller_identity: &CallerIdentity,
    ) -> Result<Option<Vote>, VotesRepositoryError> {
        Ok(self
            .table()
            .get(&(review_id, caller_identity.clone()))
            .cloned())
    }

    async fn insert(&self, vote: &Vote) -> Result<Vote, VotesRepositoryError> {
        let mut table = self.table();
        let key = (vote.review_id, vote.caller_identity.clone());
        if table.contains_key(&key) {
            return Err(VotesRepositoryError::Conflict {
                review_id: vote.review_id,
                caller_identity: vote.caller_identity.to_string(),
            });
        }
        table.insert(key, vote.clone());
        Ok(vote.clone())
    }

    async fn update_direction(
        &self,
        vote_id: Uuid,
        direction: VoteDirection,
        display_identity: &DisplayIdentity,
        voted_at: DateTime<Utc>,
    ) -> Result<Vote, VotesRepositoryError> {
        let mut table = self.table();
        let vote = table
            .values_mut()
            .find(|vote| vote.id == vote_id)
            .ok_or(VotesRepositoryError::NotFound(vote_id))?;
        vote.direction = direction;
        vote.display_identity = display_identity.clone();
        vote.created_at = voted_at;
        Ok(vote.clone())
    }

    async fn delete(&self, vote_id: Uuid) -> Result<(), VotesRepositoryError> {
        self.table().retain(|_, vote| vote.id != vote_id);
        Ok(())
    }

    async fn find_many(
        &self,
        review_ids: &[Uuid],
        caller_identity: &CallerIdentity,
    ) -> Result<Vec<Vote>, VotesRepositoryError> {
        let table = self.table();
        Ok(review_ids
            .iter()
            .filter_map(|review_id| table.get(&(*review_id, caller_identity.clone())).cloned())
            .collect())
    }

    async fn count_votes(
        &self,
        review_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, VoteTally)>, VotesRepositoryError> {
        let table = self.table();
        let mut tallies: HashMap<Uuid, VoteTally> = HashMap::new();
        for vote in table.values().filter(|vote| review_ids.contains(&vote.review_id)) {
            let tally = tallies.entry(vote.review_id).or_default();
            *tally = tally.apply(None, Some(vote.direction));
        }
        Ok(tallies.into_iter().collect())
    }
}
