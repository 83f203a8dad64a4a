//! Optimistic vote controller.
//!
//! One controller backs one UI surface. It mirrors the server's transition
//! table locally so the surface updates before the server answers, then either
//! settles on the server's direction or restores the exact pre-request state.
mod state;

pub use state::ReviewVoteState;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use review_votes_shared::types::{VoteDirection, VoteTally};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::VoteApi;
use crate::errors::ClientError;
use state::ReviewEntry;

/// Default bound on a single vote request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the notice channel; slow subscribers miss the oldest notices.
const NOTICE_CHANNEL_CAPACITY: usize = 32;

/// Controller tuning.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Requests exceeding this are treated as failed and rolled back.
    pub request_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Non-fatal, user-visible notice that a vote could not be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteNotice {
    pub review_id: Uuid,
    pub message: String,
}

/// How a vote call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAttempt {
    /// Another mutation for the same review was in flight; nothing was sent.
    Dropped,
    /// The server accepted the mutation; carries the direction it declared.
    Confirmed(Option<VoteDirection>),
    /// The request failed and the previous state was restored.
    RolledBack,
}

/// Client-side vote state machine for one UI surface.
pub struct ClientVoteController {
    api: Arc<dyn VoteApi>,
    config: ControllerConfig,
    entries: Mutex<HashMap<Uuid, ReviewEntry>>,
    notices: broadcast::Sender<VoteNotice>,
}

impl ClientVoteController {
    /// Creates a controller with no known reviews.
    ///
    /// # Arguments
    ///
    /// * `api` - Transport to the vote resource
    /// * `config` - Timeout settings
    pub fn new(api: Arc<dyn VoteApi>, config: ControllerConfig) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            api,
            config,
            entries: Mutex::new(HashMap::new()),
            notices,
        }
    }

    /// Subscribes to failure notices.
    pub fn subscribe(&self) -> broadcast::Receiver<VoteNotice> {
        self.notices.subscribe()
    }

    /// Current state of a review; unknown reviews read as no vote and empty tallies.
    pub fn state(&self, review_id: Uuid) -> ReviewVoteState {
        self.entries()
            .get(&review_id)
            .map(|entry| entry.state)
            .unwrap_or_default()
    }

    /// Whether a mutation for the review is in flight.
    pub fn is_pending(&self, review_id: Uuid) -> bool {
        self.entries()
            .get(&review_id)
            .is_some_and(|entry| entry.pending)
    }

    /// Seeds tallies from listing data. Ignored while a mutation is in flight.
    pub fn seed(&self, review_id: Uuid, tally: VoteTally) {
        let mut entries = self.entries();
        let entry = entries.entry(review_id).or_default();
        if !entry.pending {
            entry.state.tally = tally;
        }
    }

    /// Casts `direction` on a review, applying the transition optimistically.
    ///
    /// Casting the direction already held toggles the vote off, exactly as the
    /// server does. Dropped without a request when a mutation for the same
    /// review is already in flight.
    pub async fn cast_vote(&self, review_id: Uuid, direction: VoteDirection) -> VoteAttempt {
        let Some(mutation) = self.begin(review_id, |current| {
            VoteDirection::transition(current, direction).resulting()
        }) else {
            debug!(review_id = %review_id, "Vote dropped, mutation already pending");
            return VoteAttempt::Dropped;
        };

        let result = self.with_timeout(self.api.cast_vote(review_id, direction)).await;
        self.settle(mutation, result.map(|outcome| outcome.direction))
    }

    /// Removes the caller's vote on a review, with the same guard and rollback as `cast_vote`.
    pub async fn remove_vote(&self, review_id: Uuid) -> VoteAttempt {
        let Some(mutation) = self.begin(review_id, |_| None) else {
            debug!(review_id = %review_id, "Removal dropped, mutation already pending");
            return VoteAttempt::Dropped;
        };

        let result = self.with_timeout(self.api.remove_vote(review_id)).await;
        self.settle(mutation, result.map(|_| None))
    }

    /// Removes the vote when `direction` is already held, casts it otherwise.
    pub async fn toggle_vote(&self, review_id: Uuid, direction: VoteDirection) -> VoteAttempt {
        if self.state(review_id).direction == Some(direction) {
            self.remove_vote(review_id).await
        } else {
            self.cast_vote(review_id, direction).await
        }
    }

    /// Re-synchronizes directions and tallies from the server.
    ///
    /// Reviews with a mutation in flight, or one started since the refresh
    /// began, are left alone: the fetched state may predate that mutation.
    /// On error nothing is changed.
    pub async fn refresh_votes(&self, review_ids: &[Uuid]) -> Result<(), ClientError> {
        if review_ids.is_empty() {
            return Ok(());
        }

        let started: HashMap<Uuid, u64> = {
            let entries = self.entries();
            review_ids
                .iter()
                .map(|review_id| (*review_id, entries.get(review_id).map_or(0, |entry| entry.generation)))
                .collect()
        };

        let (votes, counts) = tokio::try_join!(
            self.with_timeout(self.api.fetch_votes(review_ids)),
            self.with_timeout(self.api.fetch_counts(review_ids)),
        )?;

        let mut entries = self.entries();
        for review_id in review_ids {
            let entry = entries.entry(*review_id).or_default();
            if entry.pending || started.get(review_id) != Some(&entry.generation) {
                debug!(review_id = %review_id, "Refresh skipped, vote changed while fetching");
                continue;
            }
            entry.state.direction = votes.get(review_id).copied();
            if let Some(tally) = counts.get(review_id) {
                entry.state.tally = *tally;
            }
        }
        debug!(reviews = review_ids.len(), "Votes refreshed");
        Ok(())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, ReviewEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies the optimistic transition; `None` if the review is already pending.
    fn begin(
        &self,
        review_id: Uuid,
        next: impl FnOnce(Option<VoteDirection>) -> Option<VoteDirection>,
    ) -> Option<PendingMutation<'_>> {
        let mut entries = self.entries();
        let entry = entries.entry(review_id).or_default();
        if entry.pending {
            return None;
        }
        let target = next(entry.state.direction);
        entry.begin(target).then(|| PendingMutation {
            controller: self,
            review_id,
            generation: entry.generation,
            settled: false,
        })
    }

    async fn with_timeout<T>(
        &self,
        request: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        tokio::time::timeout(self.config.request_timeout, request)
            .await
            .map_err(|_| ClientError::Timeout(self.config.request_timeout))?
    }

    fn settle(
        &self,
        mut mutation: PendingMutation<'_>,
        result: Result<Option<VoteDirection>, ClientError>,
    ) -> VoteAttempt {
        mutation.settled = true;
        let review_id = mutation.review_id;
        let mut entries = self.entries();
        let entry = entries.entry(review_id).or_default();
        match result {
            Ok(direction) => {
                entry.confirm(direction);
                VoteAttempt::Confirmed(direction)
            }
            Err(e) => {
                entry.roll_back();
                drop(entries);
                warn!(review_id = %review_id, error = %e, "Vote failed, rolled back");
                // Fails only when nobody is subscribed.
                let _ = self.notices.send(VoteNotice {
                    review_id,
                    message: format!("Could not save your vote: {e}"),
                });
                VoteAttempt::RolledBack
            }
        }
    }
}

/// A started mutation that has not settled yet.
///
/// Dropping it unsettled, as happens when the caller abandons the vote future,
/// restores the snapshot and clears the pending flag.
struct PendingMutation<'a> {
    controller: &'a ClientVoteController,
    review_id: Uuid,
    generation: u64,
    settled: bool,
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut entries = self.controller.entries();
        if let Some(entry) = entries.get_mut(&self.review_id) {
            if entry.pending && entry.generation == self.generation {
                entry.roll_back();
                debug!(review_id = %self.review_id, "Vote abandoned before settling, rolled back");
            }
        }
    }
}
